use linfa::dataset::{AsSingleTargets, DatasetBase};
use linfa::{Float, ParamGuard};
use ndarray::{ArrayBase, ArrayView1, ArrayView2, Data, Ix2};

use super::hyperparams::{
    RepeatedEditedNearestNeighboursParams, RepeatedEditedNearestNeighboursValidParams,
};
use crate::dataset::{check_shapes, ClassLabel, Resampled};
use crate::error::Result;
use crate::traits::FitResample;
use crate::under_sampling::cleaning::{Cleaner, CleaningOutcome};

impl<F: Float, L: ClassLabel> RepeatedEditedNearestNeighboursValidParams<F, L> {
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
        let cleaner = Cleaner {
            sampling_strategy: &self.sampling_strategy,
            kind_sel: self.kind_sel,
            nn_algo: &self.n_neighbors.nn_algo,
            allow_minority: self.allow_minority,
            stop_on_convergence: true,
        };

        let k = self.n_neighbors.n_neighbors;
        cleaner.run(records, targets, std::iter::repeat(k).take(self.max_iter))
    }
}

impl<F: Float, L: ClassLabel> RepeatedEditedNearestNeighboursParams<F, L> {
    /// Check the hyper-parameters, then clean a dataset and report why the iteration stopped
    pub fn clean<D, T>(&self, dataset: &DatasetBase<ArrayBase<D, Ix2>, T>) -> Result<CleaningOutcome<F, L>>
    where
        D: Data<Elem = F>,
        T: AsSingleTargets<Elem = L>,
    {
        self.check_ref()?.clean(dataset)
    }
}

impl<F: Float, L: ClassLabel> FitResample<F, L> for RepeatedEditedNearestNeighboursValidParams<F, L> {
    fn fit_resample_view(&self, records: ArrayView2<F>, targets: ArrayView1<L>) -> Result<Resampled<F, L>> {
        self.clean_view(records, targets)
            .map(CleaningOutcome::into_resampled)
    }
}

impl<F: Float, L: ClassLabel> FitResample<F, L> for RepeatedEditedNearestNeighboursParams<F, L> {
    fn fit_resample_view(&self, records: ArrayView2<F>, targets: ArrayView1<L>) -> Result<Resampled<F, L>> {
        self.check_ref()?.fit_resample_view(records, targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImbalanceError;
    use crate::under_sampling::{
        EditedNearestNeighbours, RepeatedEditedNearestNeighbours, Termination,
    };
    use linfa::Dataset;
    use ndarray::{array, Array1, Array2, Ix1};
    use rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoshiro256Plus;

    #[test]
    fn autotraits() {
        fn has_autotraits<T: Send + Sync + Sized + Unpin>() {}
        has_autotraits::<RepeatedEditedNearestNeighboursParams<f64, usize>>();
        has_autotraits::<RepeatedEditedNearestNeighboursValidParams<f64, usize>>();
        has_autotraits::<CleaningOutcome<f64, usize>>();
    }

    /// Two overlapping uniform squares with a larger second class
    fn overlapping_squares() -> Dataset<f64, usize, Ix1> {
        let mut rng = Xoshiro256Plus::seed_from_u64(7);
        let n = 150;
        let mut records = Array2::zeros((n, 2));
        let mut targets = Array1::zeros(n);

        for i in 0..n {
            let (lo, hi, label) = if i < 50 { (0.0, 1.0, 0) } else { (0.6, 2.0, 1) };
            records[[i, 0]] = rng.gen_range(lo..hi);
            records[[i, 1]] = rng.gen_range(lo..hi);
            targets[i] = label;
        }

        Dataset::new(records, targets)
    }

    #[test]
    fn removes_at_least_as_much_as_single_pass() {
        let dataset = overlapping_squares();

        let single = EditedNearestNeighbours::params().fit_resample(&dataset).unwrap();
        let outcome = RepeatedEditedNearestNeighbours::params().clean(&dataset).unwrap();

        assert!(outcome.resampled().nsamples() <= single.nsamples());
        assert!(outcome.n_passes() >= 1);
        assert_ne!(outcome.termination(), Termination::Exhausted);
    }

    #[test]
    fn converged_output_is_a_fixed_point() {
        let dataset = overlapping_squares();
        let params = RepeatedEditedNearestNeighbours::params();

        let outcome = params.clean(&dataset).unwrap();
        if outcome.termination() == Termination::Converged {
            let again = EditedNearestNeighbours::params()
                .fit_resample(outcome.resampled().dataset())
                .unwrap();
            assert_eq!(again.nsamples(), outcome.resampled().nsamples());
        }
    }

    #[test]
    fn single_pass_budget_is_exhausted() {
        let dataset = overlapping_squares();

        let outcome = RepeatedEditedNearestNeighbours::params()
            .max_iter(1)
            .clean(&dataset)
            .unwrap();

        assert!(outcome.n_passes() <= 1);
        assert_ne!(outcome.termination(), Termination::MinorityProtected);
    }

    #[test]
    fn output_keeps_original_order_within_classes() {
        let dataset = overlapping_squares();

        let resampled = RepeatedEditedNearestNeighbours::params()
            .fit_resample(&dataset)
            .unwrap();
        let indices = resampled.original_indices().unwrap();

        for (pair, labels) in indices.windows(2).zip(resampled.targets().windows(2)) {
            assert!(labels[0] <= labels[1]);
            if labels[0] == labels[1] {
                assert!(pair[0] < pair[1]);
            }
        }
    }

    #[test]
    fn single_class_is_a_distribution_error() {
        let dataset = Dataset::new(array![[0.0], [1.0], [2.0]], array![1usize, 1, 1]);

        let res = RepeatedEditedNearestNeighbours::params().clean(&dataset);
        assert!(matches!(res, Err(ImbalanceError::NotEnoughClasses(1))));
    }

    #[test]
    fn invalid_max_iter() {
        let dataset = overlapping_squares();

        let res = RepeatedEditedNearestNeighbours::params()
            .max_iter(0)
            .fit_resample(&dataset);
        assert!(matches!(res, Err(ImbalanceError::InvalidMaxIter)));
    }
}
