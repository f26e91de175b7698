//! Synthetic Minority Over-sampling TEchnique
//!
//! `fit` decides how many synthetic samples each class receives, the fitted [`Smote`] then
//! creates them by interpolating between samples of the same class and their nearest
//! neighbours.
mod algorithm;
mod hyperparams;

pub use algorithm::*;
pub use hyperparams::*;
