//! Random under-sampling
mod algorithm;
mod hyperparams;

pub use hyperparams::*;

/// Marker for random under-sampling, see [`RandomUnderSampler::params`]
#[derive(Clone, Copy, Debug)]
pub struct RandomUnderSampler;
