//! Metrics for classifiers trained on imbalanced data
//!
//! Sensitivity is the recall of a class and specificity the recall of all other classes
//! together. Both are computed one-vs-rest for every label seen either in the ground truth or
//! in the prediction, ordered by label.
use std::collections::BTreeSet;

use linfa::metrics::ToConfusionMatrix;
use log::warn;
use ndarray::{Array1, ArrayBase, Data, Ix1};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::dataset::{label_name, ClassCounts, ClassLabel};
use crate::error::{ImbalanceError, Result};

/// Averaging of the per-class scores
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(
        crate = "serde_crate",
        bound(serialize = "L: Serialize", deserialize = "L: Deserialize<'de>")
    )
)]
#[derive(Clone, Debug, PartialEq)]
pub enum Average<L> {
    /// Scores of the given positive class against all others
    Binary(L),
    /// Scores computed from the counts summed over all classes
    Micro,
    /// Unweighted mean of the class scores
    Macro,
    /// Mean of the class scores weighted by their support
    Weighted,
}

/// One-vs-rest scores of every class
#[derive(Clone, Debug, PartialEq)]
pub struct SensitivitySpecificity<L> {
    labels: Vec<L>,
    sensitivity: Array1<f64>,
    specificity: Array1<f64>,
    support: Array1<usize>,
}

/// Fraction of set entries in `hits`
///
/// This is the accuracy of the hits against a ground truth which is always `true`. Without a
/// single hit the confusion matrix only knows the label `false` and skips every sample, so the
/// empty matrix scores zero.
fn hit_rate(hits: Array1<bool>) -> Result<f64> {
    let truth = Array1::from_elem(hits.len(), true);
    let accuracy = hits.confusion_matrix(&truth)?.accuracy();

    Ok(if accuracy.is_nan() { 0.0 } else { accuracy as f64 })
}

fn mean(values: &Array1<f64>) -> f64 {
    values.mean().unwrap_or(0.0)
}

impl<L: ClassLabel> SensitivitySpecificity<L> {
    pub fn labels(&self) -> &[L] {
        &self.labels
    }

    /// Fraction of the samples of a class which are predicted as that class
    pub fn sensitivity(&self) -> Array1<f64> {
        self.sensitivity.clone()
    }

    /// Fraction of the samples of other classes which are not predicted as the class
    pub fn specificity(&self) -> Array1<f64> {
        self.specificity.clone()
    }

    /// Number of samples of every class in the ground truth
    pub fn support(&self) -> Array1<usize> {
        self.support.clone()
    }

    /// Sensitivity and specificity averaged over the classes
    pub fn averaged(&self, average: &Average<L>) -> Result<(f64, f64)> {
        let support = self.support.mapv(|s| s as f64);
        let total = support.sum();

        let scores = match average {
            Average::Binary(positive) => {
                let idx = self
                    .labels
                    .binary_search(positive)
                    .map_err(|_| ImbalanceError::UnknownClass(label_name(positive)))?;
                (self.sensitivity[idx], self.specificity[idx])
            }
            Average::Micro => {
                // every sample is a negative of all classes except its own
                let negatives = support.mapv(|s| total - s);
                let n_negatives = negatives.sum();
                (
                    if total == 0.0 {
                        0.0
                    } else {
                        self.sensitivity.dot(&support) / total
                    },
                    if n_negatives == 0.0 {
                        0.0
                    } else {
                        self.specificity.dot(&negatives) / n_negatives
                    },
                )
            }
            Average::Macro => (mean(&self.sensitivity), mean(&self.specificity)),
            Average::Weighted => {
                if total == 0.0 {
                    (0.0, 0.0)
                } else {
                    (
                        self.sensitivity.dot(&support) / total,
                        self.specificity.dot(&support) / total,
                    )
                }
            }
        };

        Ok(scores)
    }
}

/// Compute the one-vs-rest sensitivity, specificity and support of every class
///
/// Sensitivity of a class is the accuracy on its samples, specificity the accuracy of rejecting
/// it on all other samples. Classes without samples in the ground truth have a sensitivity of
/// zero.
pub fn sensitivity_specificity_support<L, D1, D2>(
    y_true: &ArrayBase<D1, Ix1>,
    y_pred: &ArrayBase<D2, Ix1>,
) -> Result<SensitivitySpecificity<L>>
where
    L: ClassLabel,
    D1: Data<Elem = L>,
    D2: Data<Elem = L>,
{
    if y_true.len() != y_pred.len() {
        return Err(ImbalanceError::MismatchedShapes(y_true.len(), y_pred.len()));
    }

    let labels: Vec<L> = y_true
        .iter()
        .chain(y_pred.iter())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let counts = ClassCounts::from_targets(y_true.iter());

    let mut sensitivity = Array1::zeros(labels.len());
    let mut specificity = Array1::zeros(labels.len());
    for (idx, label) in labels.iter().enumerate() {
        let (positives, negatives): (Vec<_>, Vec<_>) = y_true
            .iter()
            .zip(y_pred.iter())
            .partition(|(actual, _)| *actual == label);

        sensitivity[idx] = hit_rate(positives.iter().map(|(_, predicted)| *predicted == label).collect())?;
        specificity[idx] = hit_rate(negatives.iter().map(|(_, predicted)| *predicted != label).collect())?;
    }

    let support: Array1<usize> = labels.iter().map(|label| counts.get(label)).collect();
    for (label, _) in labels.iter().zip(support.iter()).filter(|(_, s)| **s == 0) {
        warn!(
            "class {:?} is only predicted, its sensitivity is set to zero",
            label
        );
    }

    Ok(SensitivitySpecificity {
        labels,
        sensitivity,
        specificity,
        support,
    })
}

/// Sensitivity, the recall, averaged with `average`
pub fn sensitivity_score<L, D1, D2>(
    y_true: &ArrayBase<D1, Ix1>,
    y_pred: &ArrayBase<D2, Ix1>,
    average: Average<L>,
) -> Result<f64>
where
    L: ClassLabel,
    D1: Data<Elem = L>,
    D2: Data<Elem = L>,
{
    let (sensitivity, _) = sensitivity_specificity_support(y_true, y_pred)?.averaged(&average)?;
    Ok(sensitivity)
}

/// Specificity averaged with `average`
pub fn specificity_score<L, D1, D2>(
    y_true: &ArrayBase<D1, Ix1>,
    y_pred: &ArrayBase<D2, Ix1>,
    average: Average<L>,
) -> Result<f64>
where
    L: ClassLabel,
    D1: Data<Elem = L>,
    D2: Data<Elem = L>,
{
    let (_, specificity) = sensitivity_specificity_support(y_true, y_pred)?.averaged(&average)?;
    Ok(specificity)
}

/// Geometric mean of sensitivity and specificity
///
/// With an averaging this is `sqrt(sensitivity * specificity)` of the averaged scores. Without
/// one, the geometric mean of the sensitivities of all classes is returned, which is zero as
/// soon as a single class is never recognised.
pub fn geometric_mean_score<L, D1, D2>(
    y_true: &ArrayBase<D1, Ix1>,
    y_pred: &ArrayBase<D2, Ix1>,
    average: Option<Average<L>>,
) -> Result<f64>
where
    L: ClassLabel,
    D1: Data<Elem = L>,
    D2: Data<Elem = L>,
{
    let scores = sensitivity_specificity_support(y_true, y_pred)?;

    match average {
        Some(average) => {
            let (sensitivity, specificity) = scores.averaged(&average)?;
            Ok((sensitivity * specificity).sqrt())
        }
        None => {
            let sensitivity = scores.sensitivity();
            if sensitivity.is_empty() {
                return Ok(0.0);
            }
            let product: f64 = sensitivity.iter().product();
            Ok(product.powf(1.0 / sensitivity.len() as f64))
        }
    }
}

/// Index balanced accuracy of the squared geometric mean
///
/// Weights `sensitivity * specificity` by `1 + alpha * (sensitivity - specificity)`, favouring
/// classifiers which recognise the positive classes when `alpha` is positive.
pub fn indexed_balanced_accuracy_score<L, D1, D2>(
    y_true: &ArrayBase<D1, Ix1>,
    y_pred: &ArrayBase<D2, Ix1>,
    alpha: f64,
    average: Average<L>,
) -> Result<f64>
where
    L: ClassLabel,
    D1: Data<Elem = L>,
    D2: Data<Elem = L>,
{
    if !alpha.is_finite() {
        return Err(ImbalanceError::InvalidAlpha(alpha));
    }

    let (sensitivity, specificity) =
        sensitivity_specificity_support(y_true, y_pred)?.averaged(&average)?;
    let dominance = sensitivity - specificity;

    Ok((1.0 + alpha * dominance) * sensitivity * specificity)
}
