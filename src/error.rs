//! Error types of the resampling algorithms
//!
use ndarray::ShapeError;
use thiserror::Error;

/// Simplified `Result` using [`ImbalanceError`](crate::ImbalanceError) as error type
pub type Result<T> = std::result::Result<T, ImbalanceError>;

/// Error variants from hyper-parameter construction, fitting and resampling
#[derive(Error, Debug)]
pub enum ImbalanceError {
    /// A ratio given as a fraction lies outside of `(0, 1]`
    #[error("ratio should be in range (0, 1], but is {0}")]
    InvalidRatio(f64),
    /// A sampling strategy could not be parsed
    #[error("unknown sampling strategy `{0}`")]
    UnknownStrategy(String),
    /// A neighbourhood selection kind could not be parsed
    #[error("unknown selection kind `{0}`, expected `all` or `mode`")]
    UnknownSelectionKind(String),
    /// A per-class target names a label which is not part of the targets
    #[error("class {0} is not present in the targets")]
    UnknownClass(String),
    /// Fractions only describe the balance between two classes
    #[error("a ratio given as a fraction requires a binary target, found {0} classes")]
    FractionNotBinary(usize),
    /// A resolved over-sampling target is below the current class size
    #[error("over-sampling cannot shrink class {class} from {current} to {target} samples")]
    OverSamplingTarget {
        class: String,
        current: usize,
        target: usize,
    },
    /// A resolved under-sampling target exceeds the current class size
    #[error("under-sampling cannot grow class {class} from {current} to {target} samples")]
    UnderSamplingTarget {
        class: String,
        current: usize,
        target: usize,
    },
    /// A neighbourhood of zero neighbours was requested
    #[error("number of neighbours must be greater than zero")]
    InvalidNeighbours,
    /// A class is too small for the requested neighbourhood
    #[error("class {class} has {available} samples, but at least {required} are required")]
    NotEnoughSamples {
        class: String,
        required: usize,
        available: usize,
    },
    /// Iterative cleaning was limited to zero passes
    #[error("maximum number of iterations must be greater than zero")]
    InvalidMaxIter,
    /// An ensemble of zero members was requested
    #[error("number of estimators must be greater than zero")]
    InvalidEstimators,
    /// The boosting learning rate is not a positive finite number
    #[error("learning rate should be positive and finite, but is {0}")]
    InvalidLearningRate(f64),
    /// The weighting factor of the index balanced accuracy is not finite
    #[error("alpha should be finite, but is {0}")]
    InvalidAlpha(f64),
    /// The records passed to `sample` differ from the ones seen during `fit`
    #[error("expected {expected} features as seen during fit, but got {found}")]
    FeatureMismatch { expected: usize, found: usize },
    /// Records and targets have a different number of rows
    #[error("the number of records ({0}) does not match the number of targets ({1})")]
    MismatchedShapes(usize, usize),
    /// Distribution error, the operation needs at least two classes
    #[error("at least two classes are required, but found {0}")]
    NotEnoughClasses(usize),
    /// The first boosting round was no better than chance, so no ensemble exists
    #[error("the weak learner is worse than random guessing, the ensemble cannot be fit")]
    WeakLearnerTooWeak,
    /// Synthetic records could not be assembled into a matrix
    #[error("invalid ndarray shape {0}")]
    Shape(#[from] ShapeError),
    /// The nearest neighbour index could not be built
    #[error(transparent)]
    NnBuild(#[from] linfa_nn::BuildError),
    /// A nearest neighbour query failed
    #[error(transparent)]
    NnQuery(#[from] linfa_nn::NnError),
    /// Error of a base linfa algorithm, such as fitting a decision tree
    #[error(transparent)]
    BaseCrate(#[from] linfa::Error),
}
