//! Combinations of over-sampling and cleaning
mod smote_enn;

pub use smote_enn::*;
