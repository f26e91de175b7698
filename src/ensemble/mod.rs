//! Ensembles of classifiers fitted on resampled data
mod rusboost;
mod weak_learner;

pub use rusboost::*;
pub use weak_learner::*;
