//! Edited nearest neighbour selection rule
//!
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use linfa::Float;
use linfa_nn::CommonNearestNeighbour;
use ndarray::{ArrayView1, ArrayView2};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::dataset::{class_indices, ClassLabel};
use crate::error::{ImbalanceError, Result};
use crate::neighbours::NeighbourIndex;

/// Rule deciding whether a sample agrees with its neighbourhood
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionKind {
    /// Keep a sample only if all of its neighbours share its label
    All,
    /// Keep a sample if the most frequent label among its neighbours is its own
    ///
    /// When several labels are equally frequent the lowest of them is taken.
    Mode,
}

impl Default for SelectionKind {
    fn default() -> Self {
        SelectionKind::All
    }
}

impl FromStr for SelectionKind {
    type Err = ImbalanceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(SelectionKind::All),
            "mode" => Ok(SelectionKind::Mode),
            _ => Err(ImbalanceError::UnknownSelectionKind(s.to_string())),
        }
    }
}

impl SelectionKind {
    /// Whether a sample labelled `query` is kept given the labels of its neighbours
    ///
    /// A sample without neighbours is always kept.
    pub fn keeps<'a, L, I>(&self, neighbours: I, query: &L) -> bool
    where
        L: ClassLabel + 'a,
        I: IntoIterator<Item = &'a L>,
    {
        match self {
            SelectionKind::All => neighbours.into_iter().all(|label| label == query),
            SelectionKind::Mode => {
                let mut votes: BTreeMap<&L, usize> = BTreeMap::new();
                for label in neighbours {
                    *votes.entry(label).or_insert(0) += 1;
                }

                // ascending labels, so the first maximum is the lowest label
                let mode = votes.into_iter().fold(None, |best, (label, count)| match best {
                    Some((_, best_count)) if best_count >= count => best,
                    _ => Some((label, count)),
                });

                match mode {
                    Some((label, _)) => label == query,
                    None => true,
                }
            }
        }
    }
}

/// One edited nearest neighbour pass over a dataset
///
/// Every sample of a class in `classes` is compared against its `k` nearest neighbours in the
/// whole dataset and dropped when `kind` rejects it. Samples of the other classes are kept.
/// Returns the surviving rows grouped by ascending label, each class in its original order.
pub(crate) fn edit_pass<F: Float, L: ClassLabel>(
    records: ArrayView2<F>,
    targets: ArrayView1<L>,
    classes: &BTreeSet<L>,
    k: usize,
    kind: SelectionKind,
    nn_algo: &CommonNearestNeighbour,
) -> Result<Vec<usize>> {
    let by_class = class_indices(&targets);
    if classes.is_empty() || records.nrows() == 0 {
        return Ok(by_class.into_values().flatten().collect());
    }

    let index = NeighbourIndex::build(nn_algo, &records)?;

    let mut kept = Vec::with_capacity(records.nrows());
    for (label, rows) in by_class {
        if !classes.contains(&label) {
            kept.extend(rows);
            continue;
        }

        for row in rows {
            let neighbours = index.neighbours_of(records.row(row), Some(row), k)?;
            if kind.keeps(neighbours.iter().map(|&idx| &targets[idx]), &label) {
                kept.push(row);
            }
        }
    }

    Ok(kept)
}
