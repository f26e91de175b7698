//! Edited nearest neighbours
//!
//! Removes the samples of the cleaned classes whose nearest neighbours disagree with their
//! label, either unanimously ([`SelectionKind::All`](crate::SelectionKind::All)) or by
//! majority vote ([`SelectionKind::Mode`](crate::SelectionKind::Mode)).
mod algorithm;
mod hyperparams;

pub use hyperparams::*;

/// Marker for edited nearest neighbour cleaning, see [`EditedNearestNeighbours::params`]
#[derive(Clone, Copy, Debug)]
pub struct EditedNearestNeighbours;
