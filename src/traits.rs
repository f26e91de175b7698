//! Capabilities shared by the resamplers
//!
use linfa::dataset::{AsSingleTargets, DatasetBase};
use linfa::Float;
use ndarray::{ArrayBase, ArrayView1, ArrayView2, Data, Ix2};

use crate::dataset::{check_shapes, ClassLabel, Resampled};
use crate::error::Result;

/// Fit a resampler on a dataset and resample the same dataset in one step
///
/// Implemented by the hyper-parameters of every resampler. Cleaning methods only need this
/// capability, over-samplers additionally return a fitted model which can resample other
/// datasets with the same features.
pub trait FitResample<F: Float, L: ClassLabel> {
    /// Resample the given records and targets
    ///
    /// The shapes are already known to agree when this is called through
    /// [`fit_resample`](FitResample::fit_resample).
    fn fit_resample_view(&self, records: ArrayView2<F>, targets: ArrayView1<L>) -> Result<Resampled<F, L>>;

    fn fit_resample<D, T>(&self, dataset: &DatasetBase<ArrayBase<D, Ix2>, T>) -> Result<Resampled<F, L>>
    where
        D: Data<Elem = F>,
        T: AsSingleTargets<Elem = L>,
    {
        let records = dataset.records().view();
        let targets = dataset.targets().as_single_targets();
        check_shapes(&records, &targets)?;

        self.fit_resample_view(records, targets)
    }
}
