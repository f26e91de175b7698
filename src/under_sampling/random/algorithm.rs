use linfa::{Float, ParamGuard};
use log::{debug, warn};
use ndarray::{ArrayView1, ArrayView2};
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;

use super::hyperparams::{RandomUnderSamplerParams, RandomUnderSamplerValidParams};
use crate::dataset::{class_indices, ClassCounts, ClassLabel, Resampled};
use crate::error::Result;
use crate::strategy::SamplingKind;
use crate::traits::FitResample;

impl<F: Float, L: ClassLabel> FitResample<F, L> for RandomUnderSamplerValidParams<F, L> {
    fn fit_resample_view(&self, records: ArrayView2<F>, targets: ArrayView1<L>) -> Result<Resampled<F, L>> {
        let counts = ClassCounts::from_targets(targets.iter());
        if counts.n_classes() < 2 {
            warn!(
                "random under-sampling on {} class(es), nothing to balance",
                counts.n_classes()
            );
        }

        let keep = self
            .sampling_strategy
            .resolve(&counts, SamplingKind::UnderSampling)?;
        let mut rng = Xoshiro256Plus::seed_from_u64(self.seed);

        let mut selected = Vec::with_capacity(targets.len());
        for (label, rows) in class_indices(&targets) {
            let n_keep = match keep.get(&label) {
                Some(&n_keep) => n_keep,
                None => {
                    selected.extend(rows);
                    continue;
                }
            };

            if self.replacement {
                selected.extend((0..n_keep).map(|_| rows[rng.gen_range(0..rows.len())]));
            } else {
                let mut picks = index::sample(&mut rng, rows.len(), n_keep).into_vec();
                picks.sort_unstable();
                selected.extend(picks.into_iter().map(|pick| rows[pick]));
            }
            debug!("class {:?} reduced from {} to {} samples", label, rows.len(), n_keep);
        }

        Ok(Resampled::select(records, targets, selected))
    }
}

impl<F: Float, L: ClassLabel> FitResample<F, L> for RandomUnderSamplerParams<F, L> {
    fn fit_resample_view(&self, records: ArrayView2<F>, targets: ArrayView1<L>) -> Result<Resampled<F, L>> {
        self.check_ref()?.fit_resample_view(records, targets)
    }
}
