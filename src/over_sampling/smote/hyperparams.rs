use std::marker::PhantomData;

use linfa::{Float, ParamGuard};
use linfa_nn::CommonNearestNeighbour;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::dataset::ClassLabel;
use crate::error::{ImbalanceError, Result};
use crate::neighbours::KNeighbours;
use crate::over_sampling::Smote;
use crate::strategy::SamplingStrategy;

/// A verified hyper-parameter set ready for SMOTE
///
/// See [`SmoteParams`] for more information.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(
        crate = "serde_crate",
        bound(
            serialize = "L: Serialize",
            deserialize = "L: Deserialize<'de> + Ord"
        )
    )
)]
#[derive(Clone, Debug, PartialEq)]
pub struct SmoteValidParams<F, L> {
    pub(crate) k_neighbors: KNeighbours,
    pub(crate) sampling_strategy: SamplingStrategy<L>,
    pub(crate) seed: u64,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) phantom: PhantomData<F>,
}

impl<F: Float, L: ClassLabel> SmoteValidParams<F, L> {
    pub fn k_neighbors(&self) -> &KNeighbours {
        &self.k_neighbors
    }

    pub fn sampling_strategy(&self) -> &SamplingStrategy<L> {
        &self.sampling_strategy
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

/// SMOTE hyper-parameters
///
/// The Synthetic Minority Over-sampling TEchnique creates new samples of the under-represented
/// classes on the line segment between a sample and one of its nearest neighbours of the same
/// class.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(
        crate = "serde_crate",
        bound(
            serialize = "L: Serialize",
            deserialize = "L: Deserialize<'de> + Ord"
        )
    )
)]
#[derive(Clone, Debug, PartialEq)]
pub struct SmoteParams<F, L>(pub(crate) SmoteValidParams<F, L>);

impl<F: Float, L: ClassLabel> SmoteParams<F, L> {
    pub fn new() -> Self {
        Self(SmoteValidParams {
            k_neighbors: KNeighbours::new(5),
            sampling_strategy: SamplingStrategy::Auto,
            seed: 42,
            phantom: PhantomData,
        })
    }

    /// Number of same-class neighbours a synthetic sample may be interpolated towards
    ///
    /// Defaults to `5`. Every over-sampled class needs more samples than this.
    pub fn k_neighbors<K: Into<KNeighbours>>(mut self, k_neighbors: K) -> Self {
        self.0.k_neighbors = k_neighbors.into();
        self
    }

    pub fn nn_algo(mut self, nn_algo: CommonNearestNeighbour) -> Self {
        self.0.k_neighbors.nn_algo = nn_algo;
        self
    }

    /// Number of samples the classes are over-sampled to
    ///
    /// Defaults to [`SamplingStrategy::Auto`], growing every class to the size of the
    /// majority class.
    pub fn sampling_strategy<S: Into<SamplingStrategy<L>>>(mut self, sampling_strategy: S) -> Self {
        self.0.sampling_strategy = sampling_strategy.into();
        self
    }

    /// Seed of the random number generator created for every call to `sample`
    pub fn seed(mut self, seed: u64) -> Self {
        self.0.seed = seed;
        self
    }
}

impl<F: Float, L: ClassLabel> Default for SmoteParams<F, L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float, L: ClassLabel> Smote<F, L> {
    /// Defaults are provided if the optional parameters are not specified:
    /// * `k_neighbors = 5`
    /// * `sampling_strategy = SamplingStrategy::Auto`
    /// * `seed = 42`
    /// * `nn_algo = KdTree`
    // Violates the convention that new should return a value of type `Self`
    #[allow(clippy::new_ret_no_self)]
    pub fn params() -> SmoteParams<F, L> {
        SmoteParams::new()
    }
}

impl<F: Float, L: ClassLabel> ParamGuard for SmoteParams<F, L> {
    type Checked = SmoteValidParams<F, L>;
    type Error = ImbalanceError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        self.0.k_neighbors.check()?;
        self.0.sampling_strategy.check()?;
        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}
