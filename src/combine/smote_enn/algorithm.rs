use linfa::dataset::{AsSingleTargets, DatasetBase};
use linfa::traits::Fit;
use linfa::{Float, ParamGuard};
use log::{debug, warn};
use ndarray::{ArrayBase, ArrayView1, ArrayView2, Data, Ix2};

use super::hyperparams::{SmoteEnnParams, SmoteEnnValidParams};
use crate::dataset::{check_shapes, ClassCounts, ClassLabel, Resampled, TargetType};
use crate::error::{ImbalanceError, Result};
use crate::over_sampling::Smote;
use crate::traits::FitResample;
use crate::under_sampling::EditedNearestNeighboursParams;

/// Fitted SMOTE + ENN resampler
///
/// Holds the fitted over-sampler, the cleaning method and the minority and majority class
/// detected during fit.
#[derive(Clone, Debug, PartialEq)]
pub struct SmoteEnn<F, L: Ord, C = EditedNearestNeighboursParams<F, L>> {
    smote: Smote<F, L>,
    cleaner: C,
    minority: L,
    majority: L,
}

impl<F: Float, L: ClassLabel, C: FitResample<F, L>> SmoteEnn<F, L, C> {
    /// Label of the class with the fewest samples during fit
    pub fn minority(&self) -> &L {
        &self.minority
    }

    /// Label of the class with the most samples during fit
    pub fn majority(&self) -> &L {
        &self.majority
    }

    pub fn class_counts(&self) -> &ClassCounts<L> {
        self.smote.class_counts()
    }

    pub fn target_type(&self) -> TargetType {
        self.smote.target_type()
    }

    pub fn smote(&self) -> &Smote<F, L> {
        &self.smote
    }

    pub fn cleaner(&self) -> &C {
        &self.cleaner
    }

    /// Over-sample and clean a dataset
    ///
    /// Rows of the minority class come first, followed by the classes which are neither
    /// minority nor majority and finally the majority class. Within a class the surviving
    /// original samples precede the synthetic ones.
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

    fn sample_view(&self, records: ArrayView2<F>, targets: ArrayView1<L>) -> Result<Resampled<F, L>> {
        let oversampled = self.smote.sample_view(records, targets)?;
        let cleaned = self.cleaner.fit_resample(oversampled.dataset())?;
        debug!(
            "over-sampled to {} samples, {} remain after cleaning",
            oversampled.nsamples(),
            cleaned.nsamples()
        );

        let rank = |label: &L| {
            let tier = if *label == self.minority {
                0u8
            } else if *label == self.majority {
                2
            } else {
                1
            };
            (tier, label.clone())
        };

        Ok(oversampled.then(cleaned).group_by(rank))
    }
}

impl<F: Float, L: ClassLabel, C: FitResample<F, L> + Clone> SmoteEnnValidParams<F, L, C> {
    fn fit_view(&self, records: ArrayView2<F>, targets: ArrayView1<L>) -> Result<SmoteEnn<F, L, C>> {
        let smote = self.smote.check_ref()?.fit_view(records, targets)?;

        let counts = smote.class_counts();
        if smote.target_type() != TargetType::Binary {
            warn!(
                "SMOTE + ENN expects a binary target but found {} classes, minority and majority are \
                 taken by sample count",
                counts.n_classes()
            );
        }

        let (minority, majority) = match (counts.minority(), counts.majority()) {
            (Some((minority, _)), Some((majority, _))) => (minority.clone(), majority.clone()),
            _ => return Err(ImbalanceError::NotEnoughClasses(0)),
        };

        Ok(SmoteEnn {
            smote,
            cleaner: self.cleaner.clone(),
            minority,
            majority,
        })
    }
}

impl<F, L, C, D, T> Fit<ArrayBase<D, Ix2>, T, ImbalanceError> for SmoteEnnValidParams<F, L, C>
where
    F: Float,
    L: ClassLabel,
    C: FitResample<F, L> + Clone,
    D: Data<Elem = F>,
    T: AsSingleTargets<Elem = L>,
{
    type Object = SmoteEnn<F, L, C>;

    fn fit(&self, dataset: &DatasetBase<ArrayBase<D, Ix2>, T>) -> Result<Self::Object> {
        let records = dataset.records().view();
        let targets = dataset.targets().as_single_targets();
        check_shapes(&records, &targets)?;

        self.fit_view(records, targets)
    }
}

impl<F: Float, L: ClassLabel, C: FitResample<F, L> + Clone> FitResample<F, L> for SmoteEnnValidParams<F, L, C> {
    fn fit_resample_view(&self, records: ArrayView2<F>, targets: ArrayView1<L>) -> Result<Resampled<F, L>> {
        self.fit_view(records, targets)?.sample_view(records, targets)
    }
}

impl<F: Float, L: ClassLabel, C: FitResample<F, L> + Clone> FitResample<F, L> for SmoteEnnParams<F, L, C> {
    fn fit_resample_view(&self, records: ArrayView2<F>, targets: ArrayView1<L>) -> Result<Resampled<F, L>> {
        self.check_ref()?.fit_resample_view(records, targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::under_sampling::{AllKnn, AllKnnParams};
    use linfa::Dataset;
    use ndarray::{array, Array1};

    #[test]
    fn autotraits() {
        fn has_autotraits<T: Send + Sync + Sized + Unpin>() {}
        has_autotraits::<SmoteEnnParams<f64, usize>>();
        has_autotraits::<SmoteEnnValidParams<f64, usize>>();
        has_autotraits::<SmoteEnn<f64, usize>>();
    }

    #[test]
    fn three_classes_are_ordered_by_role() {
        let records = Array1::linspace(0.0, 2.9, 30).into_shape((30, 1)).unwrap();
        let targets = Array1::from_shape_fn(30, |i| match i {
            0..=7 => 1usize,
            8..=17 => 2,
            _ => 0,
        });
        let dataset = Dataset::new(records, targets);

        let model = SmoteEnn::params().k_neighbors(3usize).fit(&dataset).unwrap();
        assert_eq!(model.minority(), &1);
        assert_eq!(model.majority(), &0);
        assert_eq!(model.target_type(), TargetType::Multiclass);

        let resampled = model.sample(&dataset).unwrap();
        let roles: Vec<u8> = resampled
            .targets()
            .iter()
            .map(|&label| match label {
                1 => 0,
                2 => 1,
                _ => 2,
            })
            .collect();
        assert_eq!(roles.first(), Some(&0));
        assert!(roles.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn any_cleaner_can_be_used() {
        let records = array![
            [0.0, 0.0],
            [0.1, 0.1],
            [0.2, 0.0],
            [0.0, 0.2],
            [0.1, 0.3],
            [0.3, 0.1],
            [2.0, 2.0],
            [2.1, 2.1],
            [2.2, 2.0],
            [2.0, 2.2],
            [2.1, 2.3],
            [2.3, 2.1],
            [2.2, 2.2],
            [2.4, 2.0],
            [0.15, 0.15]
        ];
        let targets = array![0usize, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1];
        let dataset = Dataset::new(records, targets);

        let cleaner: AllKnnParams<f64, usize> = AllKnn::params();
        let resampled = SmoteEnn::params()
            .k_neighbors(3usize)
            .cleaner(cleaner)
            .fit_resample(&dataset)
            .unwrap();

        // the class 1 sample inside the class 0 cluster is removed
        assert!(!resampled.sample_indices().contains(&Some(14)));
        assert_eq!(resampled.targets().iter().filter(|&&l| l == 0).count(), 9);
    }
}
