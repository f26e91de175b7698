use linfa::dataset::{AsSingleTargets, DatasetBase};
use linfa::{Float, ParamGuard};
use ndarray::{ArrayBase, ArrayView1, ArrayView2, Data, Ix2};

use super::hyperparams::{AllKnnParams, AllKnnValidParams};
use crate::dataset::{check_shapes, ClassLabel, Resampled};
use crate::error::Result;
use crate::traits::FitResample;
use crate::under_sampling::cleaning::{Cleaner, CleaningOutcome};

impl<F: Float, L: ClassLabel> AllKnnValidParams<F, L> {
    /// Clean a dataset and report why the iteration stopped
    pub fn clean<D, T>(&self, dataset: &DatasetBase<ArrayBase<D, Ix2>, T>) -> Result<CleaningOutcome<F, L>>
    where
        D: Data<Elem = F>,
        T: AsSingleTargets<Elem = L>,
    {
        let records = dataset.records().view();
        let targets = dataset.targets().as_single_targets();
        check_shapes(&records, &targets)?;

        self.clean_view(records, targets)
    }

    fn clean_view(&self, records: ArrayView2<F>, targets: ArrayView1<L>) -> Result<CleaningOutcome<F, L>> {
        // a pass without removals does not stop the schedule, a larger neighbourhood may
        // still disagree
        let cleaner = Cleaner {
            sampling_strategy: &self.sampling_strategy,
            kind_sel: self.kind_sel,
            nn_algo: &self.n_neighbors.nn_algo,
            allow_minority: self.allow_minority,
            stop_on_convergence: false,
        };

        cleaner.run(records, targets, 1..=self.n_neighbors.n_neighbors)
    }
}

impl<F: Float, L: ClassLabel> AllKnnParams<F, L> {
    /// Check the hyper-parameters, then clean a dataset and report why the iteration stopped
    pub fn clean<D, T>(&self, dataset: &DatasetBase<ArrayBase<D, Ix2>, T>) -> Result<CleaningOutcome<F, L>>
    where
        D: Data<Elem = F>,
        T: AsSingleTargets<Elem = L>,
    {
        self.check_ref()?.clean(dataset)
    }
}

impl<F: Float, L: ClassLabel> FitResample<F, L> for AllKnnValidParams<F, L> {
    fn fit_resample_view(&self, records: ArrayView2<F>, targets: ArrayView1<L>) -> Result<Resampled<F, L>> {
        self.clean_view(records, targets)
            .map(CleaningOutcome::into_resampled)
    }
}

impl<F: Float, L: ClassLabel> FitResample<F, L> for AllKnnParams<F, L> {
    fn fit_resample_view(&self, records: ArrayView2<F>, targets: ArrayView1<L>) -> Result<Resampled<F, L>> {
        self.check_ref()?.fit_resample_view(records, targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImbalanceError;
    use crate::under_sampling::{AllKnn, EditedNearestNeighbours, Termination};
    use linfa::Dataset;
    use ndarray::{Array1, Array2, Ix1};
    use rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoshiro256Plus;

    #[test]
    fn autotraits() {
        fn has_autotraits<T: Send + Sync + Sized + Unpin>() {}
        has_autotraits::<AllKnnParams<f64, usize>>();
        has_autotraits::<AllKnnValidParams<f64, usize>>();
    }

    /// Three overlapping classes with 20%, 30% and 50% of the samples
    fn three_classes(n: usize, seed: u64) -> Dataset<f64, usize, Ix1> {
        let mut rng = Xoshiro256Plus::seed_from_u64(seed);
        let mut records = Array2::zeros((n, 2));
        let mut targets = Array1::zeros(n);

        for i in 0..n {
            let label = match i * 10 / n {
                0 | 1 => 0,
                2..=4 => 1,
                _ => 2,
            };
            let center = label as f64 * 0.8;
            records[[i, 0]] = center + rng.gen_range(-1.0..1.0);
            records[[i, 1]] = rng.gen_range(-1.0..1.0);
            targets[i] = label;
        }

        Dataset::new(records, targets)
    }

    #[test]
    fn first_pass_uses_a_single_neighbour() {
        let dataset = three_classes(200, 3);

        let outcome = AllKnn::params().n_neighbors(1usize).clean(&dataset).unwrap();
        let single = EditedNearestNeighbours::params()
            .n_neighbors(1usize)
            .fit_resample(&dataset)
            .unwrap();

        assert_eq!(outcome.resampled().sample_indices(), single.sample_indices());
        assert!(outcome.n_passes() <= 1);
    }

    #[test]
    fn allow_minority_keeps_at_least_as_many_samples() {
        for seed in 0..5 {
            let dataset = three_classes(600, seed);

            let protected = AllKnn::params()
                .allow_minority(true)
                .fit_resample(&dataset)
                .unwrap();
            let unprotected = AllKnn::params().fit_resample(&dataset).unwrap();

            assert!(protected.nsamples() >= unprotected.nsamples());
        }
    }

    #[test]
    fn allow_minority_never_shrinks_below_the_initial_minority() {
        let dataset = three_classes(600, 11);

        let outcome = AllKnn::params()
            .n_neighbors(5usize)
            .allow_minority(true)
            .clean(&dataset)
            .unwrap();

        let targets = outcome.resampled().targets();
        for label in 1..3 {
            assert!(targets.iter().filter(|&&l| l == label).count() >= 120);
        }
        assert!(outcome.n_passes() <= 5);
        assert_ne!(outcome.termination(), Termination::Converged);
    }

    #[test]
    fn zero_neighbours_is_rejected() {
        let dataset = three_classes(50, 0);

        let res = AllKnn::params().n_neighbors(0usize).clean(&dataset);
        assert!(matches!(res, Err(ImbalanceError::InvalidNeighbours)));
    }
}
