//! All-KNN
//!
//! Edited nearest neighbour passes with a growing neighbourhood, starting from a single
//! neighbour.
mod algorithm;
mod hyperparams;

pub use hyperparams::*;

#[derive(Clone, Copy, Debug)]
pub struct AllKnn;
