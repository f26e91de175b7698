//! Repeated edited nearest neighbours
//!
//! Repeats edited nearest neighbour passes with a fixed neighbourhood size on the surviving
//! samples until they converge, a pass would remove a class or the iteration budget is spent.
mod algorithm;
mod hyperparams;

pub use hyperparams::*;

/// Marker for repeated edited nearest neighbour cleaning, see
/// [`RepeatedEditedNearestNeighbours::params`]
#[derive(Clone, Copy, Debug)]
pub struct RepeatedEditedNearestNeighbours;
