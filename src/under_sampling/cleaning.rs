//! Iterative edited nearest neighbour cleaning
//!
use std::collections::BTreeSet;

use linfa::Float;
use linfa_nn::CommonNearestNeighbour;
use log::{debug, warn};
use ndarray::{ArrayView1, ArrayView2};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::dataset::{ClassCounts, ClassLabel, Resampled};
use crate::error::{ImbalanceError, Result};
use crate::selection::{edit_pass, SelectionKind};
use crate::strategy::{SamplingKind, SamplingStrategy};

/// Reason an iterative cleaning stopped
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// The last pass removed no sample
    Converged,
    /// All scheduled passes were applied
    Exhausted,
    /// The last pass would have removed a class entirely and was reverted
    Emptied,
    /// The last pass would have shrunk a class below the initial minority and was reverted
    MinorityProtected,
}

/// Result of an iterative cleaning
#[derive(Debug, Clone)]
pub struct CleaningOutcome<F, L> {
    resampled: Resampled<F, L>,
    termination: Termination,
    n_passes: usize,
}

impl<F, L> CleaningOutcome<F, L> {
    pub fn resampled(&self) -> &Resampled<F, L> {
        &self.resampled
    }

    pub fn termination(&self) -> Termination {
        self.termination
    }

    /// Number of passes which were applied to the output
    pub fn n_passes(&self) -> usize {
        self.n_passes
    }

    pub fn into_resampled(self) -> Resampled<F, L> {
        self.resampled
    }
}

/// Settings shared by all iterative cleaning passes
pub(crate) struct Cleaner<'a, L> {
    pub(crate) sampling_strategy: &'a SamplingStrategy<L>,
    pub(crate) kind_sel: SelectionKind,
    pub(crate) nn_algo: &'a CommonNearestNeighbour,
    pub(crate) allow_minority: bool,
    /// Stop as soon as a pass removes nothing
    pub(crate) stop_on_convergence: bool,
}

impl<'a, L: ClassLabel> Cleaner<'a, L> {
    /// Apply one edited nearest neighbour pass per neighbourhood size in `schedule`
    ///
    /// Every pass works on the survivors of the previous one and recomputes which classes are
    /// cleaned. The output is grouped by ascending label, each class in original order.
    pub(crate) fn run<F: Float, I: IntoIterator<Item = usize>>(
        &self,
        records: ArrayView2<F>,
        targets: ArrayView1<L>,
        schedule: I,
    ) -> Result<CleaningOutcome<F, L>> {
        let initial = ClassCounts::from_targets(targets.iter());
        if initial.n_classes() < 2 {
            warn!(
                "iterative cleaning requires at least two classes, found {}",
                initial.n_classes()
            );
            return Err(ImbalanceError::NotEnoughClasses(initial.n_classes()));
        }
        let (min_label, min_count) = match initial.minority() {
            Some((label, count)) => (label.clone(), count),
            None => return Err(ImbalanceError::NotEnoughClasses(0)),
        };

        let mut current = Resampled::select(records, targets, (0..targets.len()).collect());
        let mut termination = Termination::Exhausted;
        let mut n_passes = 0;

        for k in schedule {
            let counts = ClassCounts::from_targets(current.targets().iter());
            let classes: BTreeSet<L> = self
                .sampling_strategy
                .resolve(&counts, SamplingKind::Cleaning)?
                .into_keys()
                .collect();

            let kept = edit_pass(
                current.records().view(),
                current.targets().view(),
                &classes,
                k,
                self.kind_sel,
                self.nn_algo,
            )?;

            let n_removed = current.nsamples() - kept.len();
            if n_removed == 0 {
                debug!("pass with {} neighbours removed no sample", k);
                if self.stop_on_convergence {
                    termination = Termination::Converged;
                    break;
                }
                continue;
            }

            let next = Resampled::select(current.records().view(), current.targets().view(), kept);
            let next_counts = ClassCounts::from_targets(next.targets().iter());

            if next_counts.n_classes() < counts.n_classes() {
                debug!("pass with {} neighbours would remove a class, reverted", k);
                termination = Termination::Emptied;
                break;
            }
            if self.allow_minority
                && next_counts
                    .iter()
                    .any(|(label, count)| *label != min_label && count < min_count)
            {
                debug!(
                    "pass with {} neighbours would shrink a class below {} samples, reverted",
                    k, min_count
                );
                termination = Termination::MinorityProtected;
                break;
            }

            debug!(
                "pass with {} neighbours removed {} samples, {} remain",
                k,
                n_removed,
                next.nsamples()
            );
            current = current.then(next);
            n_passes += 1;
        }

        Ok(CleaningOutcome {
            resampled: current.group_by(|label| label.clone()),
            termination,
            n_passes,
        })
    }
}
