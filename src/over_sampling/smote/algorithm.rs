use std::collections::BTreeMap;
use std::marker::PhantomData;

use linfa::dataset::{AsSingleTargets, DatasetBase};
use linfa::traits::Fit;
use linfa::{Dataset, Float, ParamGuard};
use log::{debug, warn};
use ndarray::{concatenate, Array1, Array2, ArrayBase, ArrayView1, ArrayView2, Axis, Data, Ix2, Zip};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;

use super::hyperparams::{SmoteParams, SmoteValidParams};
use crate::dataset::{
    check_shapes, class_indices, label_name, ClassCounts, ClassLabel, Resampled, TargetType,
};
use crate::error::{ImbalanceError, Result};
use crate::neighbours::{KNeighbours, NeighbourIndex};
use crate::strategy::SamplingKind;
use crate::traits::FitResample;

/// Interpolate between a sample and one of its neighbours
///
/// All features move towards `neighbour` by the same random fraction in `[0, 1)`, so the
/// synthetic sample lies on the segment between both points.
pub fn generate_sample<F: Float, R: Rng>(
    point: ArrayView1<F>,
    neighbour: ArrayView1<F>,
    rng: &mut R,
) -> Array1<F> {
    let gap = F::cast(rng.gen::<f64>());

    Zip::from(&point)
        .and(&neighbour)
        .map_collect(|&p, &n| p + gap * (n - p))
}

/// Fitted SMOTE over-sampler
///
/// Knows how many synthetic samples every class receives and the number of features it was
/// fitted on.
#[derive(Clone, Debug, PartialEq)]
pub struct Smote<F, L: Ord> {
    class_counts: ClassCounts<L>,
    n_synthetic: BTreeMap<L, usize>,
    target_type: TargetType,
    n_features: usize,
    k_neighbors: KNeighbours,
    seed: u64,
    phantom: PhantomData<F>,
}

impl<F: Float, L: ClassLabel> Smote<F, L> {
    /// Class statistics seen during fit
    pub fn class_counts(&self) -> &ClassCounts<L> {
        &self.class_counts
    }

    /// Number of synthetic samples generated for each class
    pub fn n_synthetic(&self) -> &BTreeMap<L, usize> {
        &self.n_synthetic
    }

    pub fn target_type(&self) -> TargetType {
        self.target_type
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Over-sample a dataset with the same features as the one seen during fit
    ///
    /// The output holds the original samples in their original order followed by the
    /// synthetic samples, grouped by ascending label. The same seed always produces the same
    /// synthetic samples.
    pub fn sample<D, T>(&self, dataset: &DatasetBase<ArrayBase<D, Ix2>, T>) -> Result<Resampled<F, L>>
    where
        D: Data<Elem = F>,
        T: AsSingleTargets<Elem = L>,
    {
        let records = dataset.records().view();
        let targets = dataset.targets().as_single_targets();
        check_shapes(&records, &targets)?;

        self.sample_view(records, targets)
    }

    pub(crate) fn sample_view(&self, records: ArrayView2<F>, targets: ArrayView1<L>) -> Result<Resampled<F, L>> {
        if records.ncols() != self.n_features {
            return Err(ImbalanceError::FeatureMismatch {
                expected: self.n_features,
                found: records.ncols(),
            });
        }

        let n_total: usize = self.n_synthetic.values().sum();
        let n_samples = records.nrows();
        if n_total == 0 {
            return Ok(Resampled::select(records, targets, (0..n_samples).collect()));
        }

        let k = self.k_neighbors.n_neighbors;
        let by_class = class_indices(&targets);
        let mut rng = Xoshiro256Plus::seed_from_u64(self.seed);

        let mut synthetic = Vec::with_capacity(n_total * self.n_features);
        let mut synthetic_targets = Vec::with_capacity(n_total);

        for (label, &n_generate) in self.n_synthetic.iter().filter(|(_, n)| **n > 0) {
            let rows = by_class.get(label).map(Vec::as_slice).unwrap_or(&[]);
            if rows.len() <= k {
                return Err(ImbalanceError::NotEnoughSamples {
                    class: label_name(label),
                    required: k + 1,
                    available: rows.len(),
                });
            }

            let class_records = records.select(Axis(0), rows);
            let index = NeighbourIndex::build(&self.k_neighbors.nn_algo, &class_records)?;

            // sources are used round-robin, so only the first `n_generate` need neighbours
            let neighbourhoods = (0..rows.len().min(n_generate))
                .map(|src| index.neighbours_of(class_records.row(src), Some(src), k))
                .collect::<Result<Vec<_>>>()?;

            for j in 0..n_generate {
                let src = j % rows.len();
                let neighbours = &neighbourhoods[src];
                let neighbour = if neighbours.is_empty() {
                    src
                } else {
                    neighbours[rng.gen_range(0..neighbours.len())]
                };

                let sample = generate_sample(class_records.row(src), class_records.row(neighbour), &mut rng);
                synthetic.extend(sample.iter().cloned());
                synthetic_targets.push(label.clone());
            }
            debug!("generated {} synthetic samples of class {:?}", n_generate, label);
        }

        let synthetic = Array2::from_shape_vec((n_total, self.n_features), synthetic)?;
        let records = concatenate(Axis(0), &[records.view(), synthetic.view()])?;
        let targets = targets
            .iter()
            .cloned()
            .chain(synthetic_targets.into_iter())
            .collect::<Array1<L>>();

        let sample_indices = (0..n_samples)
            .map(Some)
            .chain(std::iter::repeat(None).take(n_total))
            .collect();

        Ok(Resampled::new(Dataset::new(records, targets), sample_indices))
    }
}

impl<F: Float, L: ClassLabel> SmoteValidParams<F, L> {
    pub(crate) fn fit_view(&self, records: ArrayView2<F>, targets: ArrayView1<L>) -> Result<Smote<F, L>> {
        let class_counts = ClassCounts::from_targets(targets.iter());
        let target_type = class_counts.target_type();
        if target_type == TargetType::SingleClass {
            warn!(
                "SMOTE fitted on {} class(es), no synthetic samples will be generated",
                class_counts.n_classes()
            );
        }

        let n_synthetic = self
            .sampling_strategy
            .resolve(&class_counts, SamplingKind::OverSampling)?;

        let k = self.k_neighbors.n_neighbors;
        for (label, &n_generate) in &n_synthetic {
            let available = class_counts.get(label);
            if n_generate > 0 && available <= k {
                return Err(ImbalanceError::NotEnoughSamples {
                    class: label_name(label),
                    required: k + 1,
                    available,
                });
            }
        }

        Ok(Smote {
            class_counts,
            n_synthetic,
            target_type,
            n_features: records.ncols(),
            k_neighbors: self.k_neighbors.clone(),
            seed: self.seed,
            phantom: PhantomData,
        })
    }
}

impl<F, L, D, T> Fit<ArrayBase<D, Ix2>, T, ImbalanceError> for SmoteValidParams<F, L>
where
    F: Float,
    L: ClassLabel,
    D: Data<Elem = F>,
    T: AsSingleTargets<Elem = L>,
{
    type Object = Smote<F, L>;

    /// Resolve the number of synthetic samples per class
    fn fit(&self, dataset: &DatasetBase<ArrayBase<D, Ix2>, T>) -> Result<Self::Object> {
        let records = dataset.records().view();
        let targets = dataset.targets().as_single_targets();
        check_shapes(&records, &targets)?;

        self.fit_view(records, targets)
    }
}

impl<F: Float, L: ClassLabel> FitResample<F, L> for SmoteValidParams<F, L> {
    fn fit_resample_view(&self, records: ArrayView2<F>, targets: ArrayView1<L>) -> Result<Resampled<F, L>> {
        self.fit_view(records, targets)?.sample_view(records, targets)
    }
}

impl<F: Float, L: ClassLabel> FitResample<F, L> for SmoteParams<F, L> {
    fn fit_resample_view(&self, records: ArrayView2<F>, targets: ArrayView1<L>) -> Result<Resampled<F, L>> {
        self.check_ref()?.fit_resample_view(records, targets)
    }
}
