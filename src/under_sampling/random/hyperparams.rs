use std::marker::PhantomData;

use linfa::{Float, ParamGuard};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::dataset::ClassLabel;
use crate::error::{ImbalanceError, Result};
use crate::strategy::SamplingStrategy;
use crate::under_sampling::RandomUnderSampler;

/// A verified hyper-parameter set ready for random under-sampling
///
/// See [`RandomUnderSamplerParams`] for more information.
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
pub struct RandomUnderSamplerValidParams<F, L> {
    pub(crate) sampling_strategy: SamplingStrategy<L>,
    pub(crate) replacement: bool,
    pub(crate) seed: u64,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) phantom: PhantomData<F>,
}

impl<F: Float, L: ClassLabel> RandomUnderSamplerValidParams<F, L> {
    pub fn sampling_strategy(&self) -> &SamplingStrategy<L> {
        &self.sampling_strategy
    }

    pub fn replacement(&self) -> bool {
        self.replacement
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

/// Random under-sampling hyper-parameters
///
/// Draws a random subset of the classes selected by the sampling strategy, the remaining
/// classes are kept untouched.
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
pub struct RandomUnderSamplerParams<F, L>(pub(crate) RandomUnderSamplerValidParams<F, L>);

impl<F: Float, L: ClassLabel> RandomUnderSamplerParams<F, L> {
    pub fn new() -> Self {
        Self(RandomUnderSamplerValidParams {
            sampling_strategy: SamplingStrategy::Auto,
            replacement: false,
            seed: 42,
            phantom: PhantomData,
        })
    }

    /// Number of samples kept per class
    ///
    /// Defaults to [`SamplingStrategy::Auto`], reducing every class but the minority to the
    /// size of the minority class.
    pub fn sampling_strategy<S: Into<SamplingStrategy<L>>>(mut self, sampling_strategy: S) -> Self {
        self.0.sampling_strategy = sampling_strategy.into();
        self
    }

    /// Draw with replacement, defaults to `false`
    pub fn replacement(mut self, replacement: bool) -> Self {
        self.0.replacement = replacement;
        self
    }

    /// Seed of the random number generator created for every call
    pub fn seed(mut self, seed: u64) -> Self {
        self.0.seed = seed;
        self
    }
}

impl<F: Float, L: ClassLabel> Default for RandomUnderSamplerParams<F, L> {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomUnderSampler {
    /// Defaults are provided if the optional parameters are not specified:
    /// * `sampling_strategy = SamplingStrategy::Auto`
    /// * `replacement = false`
    /// * `seed = 42`
    // Violates the convention that new should return a value of type `Self`
    #[allow(clippy::new_ret_no_self)]
    pub fn params<F: Float, L: ClassLabel>() -> RandomUnderSamplerParams<F, L> {
        RandomUnderSamplerParams::new()
    }
}

impl<F: Float, L: ClassLabel> ParamGuard for RandomUnderSamplerParams<F, L> {
    type Checked = RandomUnderSamplerValidParams<F, L>;
    type Error = ImbalanceError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        self.0.sampling_strategy.check()?;
        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}
