use std::collections::BTreeMap;

use linfa::traits::{Fit, Predict};
use linfa::{Dataset, Float};
use linfa_trees::{DecisionTree, DecisionTreeParams};
use ndarray::{Array1, Array2, ArrayView2, Ix1};

use crate::dataset::ClassLabel;
use crate::error::Result;

/// A classifier which can be fitted on a weighted dataset and boosted
///
/// Implemented for [`DecisionTreeParams`], a depth one tree being the default weak learner
/// of [`RusBoost`](crate::ensemble::RusBoost).
pub trait WeakLearner<F: Float, L: ClassLabel> {
    type Estimator: WeakEstimator<F, L>;

    /// Fit an estimator on a weighted dataset
    ///
    /// `classes` lists every label of the boosted problem in ascending order, the dataset may
    /// miss some of them. `seed` is unique to every boosting round and may be used by
    /// randomised learners.
    fn fit_weighted(
        &self,
        dataset: &Dataset<F, L, Ix1>,
        classes: &[L],
        seed: u64,
    ) -> Result<Self::Estimator>;
}

/// A fitted member of a boosted ensemble
pub trait WeakEstimator<F: Float, L: ClassLabel> {
    fn predict_labels(&self, records: ArrayView2<F>) -> Array1<L>;

    /// Class membership probabilities with one column per class passed to
    /// [`WeakLearner::fit_weighted`]
    fn predict_proba(&self, records: ArrayView2<F>) -> Array2<F>;

    /// Relative importance of every feature, summing to one or all zero
    fn feature_importance(&self) -> Array1<F>;
}

/// Probability rows putting all mass on the predicted class
pub fn one_hot<F: Float, L: ClassLabel>(predictions: &Array1<L>, classes: &[L]) -> Array2<F> {
    let mut proba = Array2::zeros((predictions.len(), classes.len()));
    for (mut row, label) in proba.rows_mut().into_iter().zip(predictions.iter()) {
        if let Ok(col) = classes.binary_search(label) {
            row[col] = F::one();
        }
    }

    proba
}

/// A decision tree fitted as weak learner
///
/// Probabilities are the weighted class frequencies of the training samples which received
/// the same prediction. For a stump with two distinct leaves these are the leaf frequencies.
#[derive(Debug)]
pub struct TreeEstimator<F: Float, L: ClassLabel> {
    tree: DecisionTree<F, L>,
    classes: Vec<L>,
    n_features: usize,
    frequencies: BTreeMap<L, Array1<F>>,
}

impl<F: Float, L: ClassLabel> TreeEstimator<F, L> {
    pub fn tree(&self) -> &DecisionTree<F, L> {
        &self.tree
    }
}

impl<F: Float, L: ClassLabel + Default> WeakLearner<F, L> for DecisionTreeParams<F, L> {
    type Estimator = TreeEstimator<F, L>;

    fn fit_weighted(
        &self,
        dataset: &Dataset<F, L, Ix1>,
        classes: &[L],
        _seed: u64,
    ) -> Result<Self::Estimator> {
        let tree =
            <DecisionTreeParams<F, L> as Fit<Array2<F>, Array1<L>, linfa::Error>>::fit(self, dataset)?;

        let predictions: Array1<L> = tree.predict(dataset.records());
        let mut frequencies: BTreeMap<L, Array1<F>> = BTreeMap::new();
        for (i, (predicted, actual)) in predictions.iter().zip(dataset.targets().iter()).enumerate() {
            if let Ok(col) = classes.binary_search(actual) {
                let row = frequencies
                    .entry(predicted.clone())
                    .or_insert_with(|| Array1::zeros(classes.len()));
                row[col] += F::cast(dataset.weight_for(i));
            }
        }
        for row in frequencies.values_mut() {
            let total = row.sum();
            if total > F::zero() {
                *row /= total;
            }
        }

        Ok(TreeEstimator {
            tree,
            classes: classes.to_vec(),
            n_features: dataset.records().ncols(),
            frequencies,
        })
    }
}

impl<F: Float, L: ClassLabel + Default> WeakEstimator<F, L> for TreeEstimator<F, L> {
    fn predict_labels(&self, records: ArrayView2<F>) -> Array1<L> {
        self.tree.predict(&records)
    }

    fn predict_proba(&self, records: ArrayView2<F>) -> Array2<F> {
        let predictions = self.predict_labels(records);
        let mut proba = one_hot(&predictions, &self.classes);
        for (mut row, label) in proba.rows_mut().into_iter().zip(predictions.iter()) {
            if let Some(frequencies) = self.frequencies.get(label) {
                row.assign(frequencies);
            }
        }

        proba
    }

    fn feature_importance(&self) -> Array1<F> {
        let mut importance = Array1::zeros(self.n_features);
        for (out, value) in importance.iter_mut().zip(self.tree.feature_importance()) {
            // a tree without split has no impurity decrease to share
            if !value.is_nan() {
                *out = value;
            }
        }

        importance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use linfa_trees::DecisionTree;
    use ndarray::array;

    fn stump() -> DecisionTreeParams<f64, usize> {
        DecisionTree::params().max_depth(Some(1))
    }

    #[test]
    fn one_hot_rows() {
        let proba: Array2<f64> = one_hot(&array![2usize, 0, 2], &[0, 2]);
        assert_abs_diff_eq!(proba, array![[0., 1.], [1., 0.], [0., 1.]]);
    }

    #[test]
    fn stump_frequencies() {
        let records = array![[0.0], [1.0], [2.0], [3.0], [10.0], [11.0], [12.0], [13.0]];
        // the third sample sits on the wrong side of the best split
        let targets = array![0usize, 0, 1, 0, 1, 1, 1, 1];
        let dataset = Dataset::new(records, targets).with_weights(Array1::from_elem(8, 1.0));

        let estimator = stump().fit_weighted(&dataset, &[0, 1], 0).unwrap();
        let proba = estimator.predict_proba(array![[0.5], [12.5]].view());

        for row in proba.rows() {
            assert_abs_diff_eq!(row.sum(), 1.0, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(proba[[0, 0]], 0.75, epsilon = 1e-12);
        assert_abs_diff_eq!(proba[[1, 1]], 1.0, epsilon = 1e-12);
        assert_eq!(estimator.predict_labels(array![[0.5], [12.5]].view()), array![0, 1]);
    }

    #[test]
    fn importance_without_split_is_zero() {
        let dataset = Dataset::new(array![[0.0, 1.0], [1.0, 1.0]], array![1usize, 1])
            .with_weights(Array1::from_elem(2, 1.0));

        let estimator = stump().fit_weighted(&dataset, &[0, 1], 0).unwrap();
        assert_abs_diff_eq!(estimator.feature_importance(), array![0., 0.]);
    }
}
