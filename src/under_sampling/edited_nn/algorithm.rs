use std::collections::BTreeSet;

use linfa::{Float, ParamGuard};
use log::{debug, warn};
use ndarray::{ArrayView1, ArrayView2};

use super::hyperparams::{EditedNearestNeighboursParams, EditedNearestNeighboursValidParams};
use crate::dataset::{ClassCounts, ClassLabel, Resampled};
use crate::error::Result;
use crate::selection::edit_pass;
use crate::strategy::SamplingKind;
use crate::traits::FitResample;

impl<F: Float, L: ClassLabel> FitResample<F, L> for EditedNearestNeighboursValidParams<F, L> {
    fn fit_resample_view(&self, records: ArrayView2<F>, targets: ArrayView1<L>) -> Result<Resampled<F, L>> {
        let counts = ClassCounts::from_targets(targets.iter());
        if counts.n_classes() < 2 {
            warn!(
                "edited nearest neighbours on {} class(es), nothing is cleaned",
                counts.n_classes()
            );
        }

        let classes: BTreeSet<L> = self
            .sampling_strategy
            .resolve(&counts, SamplingKind::Cleaning)?
            .into_keys()
            .collect();

        let kept = edit_pass(
            records,
            targets,
            &classes,
            self.n_neighbors.n_neighbors,
            self.kind_sel,
            &self.n_neighbors.nn_algo,
        )?;
        debug!(
            "edited nearest neighbours removed {} of {} samples",
            records.nrows() - kept.len(),
            records.nrows()
        );

        Ok(Resampled::select(records, targets, kept))
    }
}

impl<F: Float, L: ClassLabel> FitResample<F, L> for EditedNearestNeighboursParams<F, L> {
    fn fit_resample_view(&self, records: ArrayView2<F>, targets: ArrayView1<L>) -> Result<Resampled<F, L>> {
        self.check_ref()?.fit_resample_view(records, targets)
    }
}
