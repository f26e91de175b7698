//! Under-sampling and cleaning methods
//!
//! The cleaning methods remove samples whose neighbourhood disagrees with their label, the
//! random under-sampler draws a subset of the over-represented classes.
mod all_knn;
pub(crate) mod cleaning;
mod edited_nn;
mod random;
mod repeated_enn;

pub use all_knn::*;
pub use cleaning::{CleaningOutcome, Termination};
pub use edited_nn::*;
pub use random::*;
pub use repeated_enn::*;
