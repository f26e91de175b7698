//! Class statistics and resampled datasets
//!
use std::collections::BTreeMap;
use std::fmt::Debug;

use linfa::{Dataset, Float, Label};
use ndarray::{Array1, ArrayView1, ArrayView2, Axis, Ix1};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::error::{ImbalanceError, Result};

/// Class labels which can be ordered and reported
///
/// Resampling groups its output by class and breaks ties between classes of equal size by
/// comparing labels, so on top of [`Label`] the labels need a total order.
pub trait ClassLabel: Label + Ord + Debug {}

impl<L: Label + Ord + Debug> ClassLabel for L {}

/// Kind of classification task given by a set of targets
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetType {
    /// Only a single label occurs, nothing can be balanced
    SingleClass,
    /// Exactly two labels occur
    Binary,
    /// More than two labels occur
    Multiclass,
}

/// Number of samples for each class, ordered by label
#[derive(Clone, Debug, PartialEq)]
pub struct ClassCounts<L: Ord>(BTreeMap<L, usize>);

impl<L: ClassLabel> ClassCounts<L> {
    pub fn from_targets<'a, I>(targets: I) -> Self
    where
        I: IntoIterator<Item = &'a L>,
        L: 'a,
    {
        let mut counts = BTreeMap::new();
        for label in targets {
            *counts.entry(label.clone()).or_insert(0) += 1;
        }

        ClassCounts(counts)
    }

    /// Number of samples of `label`, zero for unknown labels
    pub fn get(&self, label: &L) -> usize {
        self.0.get(label).copied().unwrap_or(0)
    }

    pub fn contains(&self, label: &L) -> bool {
        self.0.contains_key(label)
    }

    pub fn n_classes(&self) -> usize {
        self.0.len()
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    /// Labels in ascending order
    pub fn labels(&self) -> impl Iterator<Item = &L> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&L, usize)> {
        self.0.iter().map(|(label, &count)| (label, count))
    }

    /// The class with the fewest samples, ties are broken towards the lowest label
    pub fn minority(&self) -> Option<(&L, usize)> {
        self.iter().fold(None, |best, (label, count)| match best {
            Some((_, best_count)) if best_count <= count => best,
            _ => Some((label, count)),
        })
    }

    /// The class with the most samples, ties are broken towards the highest label
    pub fn majority(&self) -> Option<(&L, usize)> {
        self.iter().fold(None, |best, (label, count)| match best {
            Some((_, best_count)) if best_count > count => best,
            _ => Some((label, count)),
        })
    }

    pub fn target_type(&self) -> TargetType {
        match self.n_classes() {
            0 | 1 => TargetType::SingleClass,
            2 => TargetType::Binary,
            _ => TargetType::Multiclass,
        }
    }
}

/// Outcome of a resampling operation
///
/// Holds the resampled dataset together with the row each sample originates from. Samples
/// which were synthesized have no original row.
#[derive(Debug, Clone)]
pub struct Resampled<F, L> {
    dataset: Dataset<F, L, Ix1>,
    sample_indices: Vec<Option<usize>>,
}

impl<F: Float, L: ClassLabel> Resampled<F, L> {
    pub(crate) fn new(dataset: Dataset<F, L, Ix1>, sample_indices: Vec<Option<usize>>) -> Self {
        Resampled {
            dataset,
            sample_indices,
        }
    }

    /// Keep the rows at `indices`, in that order
    pub(crate) fn select(
        records: ArrayView2<F>,
        targets: ArrayView1<L>,
        indices: Vec<usize>,
    ) -> Self {
        let dataset = Dataset::new(
            records.select(Axis(0), &indices),
            targets.select(Axis(0), &indices),
        );

        Resampled::new(dataset, indices.into_iter().map(Some).collect())
    }

    /// Chain a second resampling which was applied on top of this one
    ///
    /// The indices of `next` point into this dataset and are translated back to the original
    /// rows.
    pub(crate) fn then(&self, next: Resampled<F, L>) -> Self {
        let sample_indices = next
            .sample_indices
            .iter()
            .map(|idx| idx.and_then(|idx| self.sample_indices[idx]))
            .collect();

        Resampled::new(next.dataset, sample_indices)
    }

    /// Stable reordering of the rows such that classes appear in ascending `rank`
    pub(crate) fn group_by<K: Ord, R: Fn(&L) -> K>(self, rank: R) -> Self {
        let targets = self.dataset.targets();
        let mut order: Vec<usize> = (0..targets.len()).collect();
        order.sort_by_key(|&idx| rank(&targets[idx]));

        let dataset = Dataset::new(
            self.dataset.records().select(Axis(0), &order),
            targets.select(Axis(0), &order),
        );
        let sample_indices = order.iter().map(|&idx| self.sample_indices[idx]).collect();

        Resampled::new(dataset, sample_indices)
    }

    pub fn dataset(&self) -> &Dataset<F, L, Ix1> {
        &self.dataset
    }

    pub fn records(&self) -> &ndarray::Array2<F> {
        self.dataset.records()
    }

    pub fn targets(&self) -> &Array1<L> {
        self.dataset.targets()
    }

    pub fn nsamples(&self) -> usize {
        self.sample_indices.len()
    }

    /// Original row of every resampled sample, `None` for synthetic samples
    pub fn sample_indices(&self) -> &[Option<usize>] {
        &self.sample_indices
    }

    /// Original rows of the resampled samples, if none of them is synthetic
    pub fn original_indices(&self) -> Option<Vec<usize>> {
        self.sample_indices.iter().copied().collect()
    }

    pub fn into_dataset(self) -> Dataset<F, L, Ix1> {
        self.dataset
    }

    pub fn into_parts(self) -> (Dataset<F, L, Ix1>, Vec<Option<usize>>) {
        (self.dataset, self.sample_indices)
    }
}

pub(crate) fn check_shapes<F, L>(records: &ArrayView2<F>, targets: &ArrayView1<L>) -> Result<()> {
    if records.nrows() != targets.len() {
        Err(ImbalanceError::MismatchedShapes(
            records.nrows(),
            targets.len(),
        ))
    } else {
        Ok(())
    }
}

/// Rows of each class in ascending order, grouped by label
pub(crate) fn class_indices<L: ClassLabel>(targets: &ArrayView1<L>) -> BTreeMap<L, Vec<usize>> {
    let mut indices: BTreeMap<L, Vec<usize>> = BTreeMap::new();
    for (idx, label) in targets.iter().enumerate() {
        indices.entry(label.clone()).or_default().push(idx);
    }

    indices
}

pub(crate) fn label_name<L: Debug>(label: &L) -> String {
    format!("{:?}", label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn autotraits() {
        fn has_autotraits<T: Send + Sync + Sized + Unpin>() {}
        has_autotraits::<ClassCounts<usize>>();
        has_autotraits::<Resampled<f64, usize>>();
        has_autotraits::<TargetType>();
    }

    #[test]
    fn minority_and_majority_break_ties_by_label() {
        let targets = array![2usize, 0, 1, 1, 0, 2];
        let counts = ClassCounts::from_targets(targets.iter());

        assert_eq!(counts.minority(), Some((&0, 2)));
        assert_eq!(counts.majority(), Some((&2, 2)));
        assert_eq!(counts.target_type(), TargetType::Multiclass);
        assert_eq!(counts.total(), 6);
    }

    #[test]
    fn counts_of_imbalanced_binary_target() {
        let targets = array![0usize, 1, 0, 0, 0, 1, 1, 1, 1, 1, 1, 0, 0, 1, 1, 1, 1, 0, 1, 0];
        let counts = ClassCounts::from_targets(targets.iter());

        assert_eq!(counts.minority(), Some((&0, 8)));
        assert_eq!(counts.majority(), Some((&1, 12)));
        assert_eq!(counts.target_type(), TargetType::Binary);
    }

    #[test]
    fn single_class_target() {
        let targets = array![true, true, true];
        let counts = ClassCounts::from_targets(targets.iter());

        assert_eq!(counts.target_type(), TargetType::SingleClass);
        assert_eq!(counts.minority(), counts.majority());
    }

    #[test]
    fn chained_resampling_keeps_original_rows() {
        let records = array![[0., 0.], [1., 1.], [2., 2.], [3., 3.]];
        let targets = array![0usize, 1, 0, 1];

        let first = Resampled::select(records.view(), targets.view(), vec![3, 1, 2]);
        let second = Resampled::select(
            first.records().view(),
            first.targets().view(),
            vec![2, 0],
        );
        let chained = first.then(second);

        assert_eq!(chained.sample_indices(), &[Some(2), Some(3)]);
        assert_eq!(chained.records(), &array![[2., 2.], [3., 3.]]);
    }

    #[test]
    fn grouping_is_stable() {
        let records = array![[0.], [1.], [2.], [3.], [4.]];
        let targets = array![1usize, 0, 1, 0, 1];

        let grouped =
            Resampled::select(records.view(), targets.view(), vec![0, 1, 2, 3, 4]).group_by(|l| *l);

        assert_eq!(grouped.targets(), &array![0, 0, 1, 1, 1]);
        assert_eq!(grouped.original_indices(), Some(vec![1, 3, 0, 2, 4]));
    }
}
