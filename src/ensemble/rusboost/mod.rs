//! Random under-sampling boosting
//!
//! Every member of the ensemble is fitted on a random under-sample of the dataset, see
//! [`RusBoost`] for the details of the boosting rounds.
mod algorithm;
mod hyperparams;

pub use algorithm::*;
pub use hyperparams::*;
