//! SMOTE followed by edited nearest neighbour cleaning
mod algorithm;
mod hyperparams;

pub use algorithm::*;
pub use hyperparams::*;
