//! Neighbourhood configuration and queries
//!
use linfa::Float;
use linfa_nn::{distance::L2Dist, CommonNearestNeighbour, NearestNeighbour, NearestNeighbourIndex};
use ndarray::{ArrayBase, ArrayView1, Data, Ix2};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::error::{ImbalanceError, Result};

/// Size of a neighbourhood and the index used to search it
///
/// Can be created from a plain number of neighbours, in which case a k-d tree is used, or
/// combined with any of the nearest neighbour algorithms provided by `linfa-nn`.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct KNeighbours {
    pub(crate) n_neighbors: usize,
    pub(crate) nn_algo: CommonNearestNeighbour,
}

impl KNeighbours {
    pub fn new(n_neighbors: usize) -> Self {
        KNeighbours {
            n_neighbors,
            nn_algo: CommonNearestNeighbour::KdTree,
        }
    }

    /// Search the neighbourhood with a different nearest neighbour algorithm
    pub fn with_algo(mut self, nn_algo: CommonNearestNeighbour) -> Self {
        self.nn_algo = nn_algo;
        self
    }

    pub fn n_neighbors(&self) -> usize {
        self.n_neighbors
    }

    pub fn nn_algo(&self) -> &CommonNearestNeighbour {
        &self.nn_algo
    }

    pub(crate) fn check(&self) -> Result<()> {
        if self.n_neighbors == 0 {
            Err(ImbalanceError::InvalidNeighbours)
        } else {
            Ok(())
        }
    }
}

impl From<usize> for KNeighbours {
    fn from(n_neighbors: usize) -> Self {
        KNeighbours::new(n_neighbors)
    }
}

/// Spatial index over a set of reference points, queried with the euclidean distance
pub(crate) struct NeighbourIndex<'a, F: Float>(Box<dyn 'a + Send + Sync + NearestNeighbourIndex<F>>);

impl<'a, F: Float> NeighbourIndex<'a, F> {
    pub(crate) fn build<D: Data<Elem = F>>(
        nn_algo: &CommonNearestNeighbour,
        points: &'a ArrayBase<D, Ix2>,
    ) -> Result<Self> {
        let index = nn_algo.from_batch(points, L2Dist)?;
        Ok(NeighbourIndex(index))
    }

    /// Rows of the `k` nearest reference points, nearest first
    ///
    /// The reference point `exclude` is skipped, so a point of the index never appears in its
    /// own neighbourhood.
    pub(crate) fn neighbours_of(
        &self,
        point: ArrayView1<F>,
        exclude: Option<usize>,
        k: usize,
    ) -> Result<Vec<usize>> {
        let n_query = if exclude.is_some() { k + 1 } else { k };
        let neighbours = self
            .0
            .k_nearest(point, n_query)?
            .into_iter()
            .map(|(_, idx)| idx)
            .filter(|idx| Some(*idx) != exclude)
            .take(k)
            .collect();

        Ok(neighbours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn autotraits() {
        fn has_autotraits<T: Send + Sync + Sized + Unpin>() {}
        has_autotraits::<KNeighbours>();
    }

    #[test]
    fn zero_neighbours_is_rejected() {
        assert!(matches!(
            KNeighbours::from(0).check(),
            Err(ImbalanceError::InvalidNeighbours)
        ));
        assert!(KNeighbours::from(3).check().is_ok());
    }

    #[test]
    fn query_excludes_point_itself() {
        let points = array![[0.0, 0.0], [1.0, 0.0], [3.0, 0.0], [10.0, 0.0]];

        for algo in vec![
            CommonNearestNeighbour::LinearSearch,
            CommonNearestNeighbour::KdTree,
            CommonNearestNeighbour::BallTree,
        ] {
            let index = NeighbourIndex::build(&algo, &points).unwrap();

            let neighbours = index.neighbours_of(points.row(1), Some(1), 2).unwrap();
            assert_eq!(neighbours, vec![0, 2]);

            let neighbours = index.neighbours_of(points.row(3), None, 1).unwrap();
            assert_eq!(neighbours, vec![3]);
        }
    }
}
