//! `linfa-imbalance` provides resampling algorithms for classification datasets whose classes
//! are unequally represented, in the spirit of Python's `imbalanced-learn`.
//!
//! ## Current state
//!
//! The crate offers
//! * over-sampling with [`Smote`](over_sampling::Smote), which synthesizes samples between
//!   neighbours of the same class,
//! * cleaning with [`EditedNearestNeighbours`](under_sampling::EditedNearestNeighbours),
//!   [`RepeatedEditedNearestNeighbours`](under_sampling::RepeatedEditedNearestNeighbours) and
//!   [`AllKnn`](under_sampling::AllKnn), which remove samples disagreeing with their
//!   neighbourhood, as well as [`RandomUnderSampler`](under_sampling::RandomUnderSampler),
//! * the combination [`SmoteEnn`](combine::SmoteEnn) of over-sampling and cleaning,
//! * the [`RusBoost`](ensemble::RusBoost) ensemble, boosting weak learners fitted on random
//!   under-samples,
//! * [`metrics`] suited for imbalanced problems.
//!
//! Every resampler is configured by a set of hyper-parameters which is checked with
//! [`ParamGuard`](linfa::ParamGuard) and returns a [`Resampled`] dataset which remembers the
//! original row of every sample.
//!
//! ## Example
//!
//! ```no_run
//! use linfa::prelude::*;
//! use linfa_imbalance::prelude::*;
//! use ndarray::{array, Array2};
//!
//! let records = Array2::from_shape_fn((20, 2), |(i, j)| (i * 2 + j) as f64);
//! let targets = array![0usize, 1, 0, 0, 0, 1, 1, 1, 1, 1, 1, 0, 0, 1, 1, 1, 1, 0, 1, 0];
//! let dataset = Dataset::new(records, targets);
//!
//! let resampled = SmoteEnn::params()
//!     .sampling_strategy(SamplingStrategy::Auto)
//!     .fit_resample(&dataset)
//!     .unwrap();
//! println!("{} samples after resampling", resampled.nsamples());
//! ```
//!

pub mod combine;
mod dataset;
pub mod ensemble;
pub mod error;
pub mod metrics;
mod neighbours;
pub mod over_sampling;
pub mod prelude;
mod selection;
mod strategy;
mod traits;
pub mod under_sampling;

pub use dataset::{ClassCounts, ClassLabel, Resampled, TargetType};
pub use error::{ImbalanceError, Result};
pub use neighbours::KNeighbours;
pub use selection::SelectionKind;
pub use strategy::{SamplingKind, SamplingStrategy};
pub use traits::FitResample;
