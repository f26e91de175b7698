//! linfa-imbalance prelude.
//!
//! This module contains the resamplers, their capabilities and the types describing their
//! results, so they can be imported as a group.
//!

#[doc(no_inline)]
pub use crate::error::{ImbalanceError, Result};

#[doc(no_inline)]
pub use crate::traits::FitResample;

#[doc(no_inline)]
pub use crate::dataset::{ClassCounts, ClassLabel, Resampled, TargetType};

#[doc(no_inline)]
pub use crate::strategy::{SamplingKind, SamplingStrategy};

#[doc(no_inline)]
pub use crate::neighbours::KNeighbours;

#[doc(no_inline)]
pub use crate::selection::SelectionKind;

#[doc(no_inline)]
pub use crate::over_sampling::Smote;

#[doc(no_inline)]
pub use crate::under_sampling::{
    AllKnn, EditedNearestNeighbours, RandomUnderSampler, RepeatedEditedNearestNeighbours,
    Termination,
};

#[doc(no_inline)]
pub use crate::combine::SmoteEnn;

#[doc(no_inline)]
pub use crate::ensemble::{BoostingAlgorithm, RusBoost, WeakEstimator, WeakLearner};
