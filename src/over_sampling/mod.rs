//! Over-sampling methods
mod smote;

pub use smote::*;
