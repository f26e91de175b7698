use std::marker::PhantomData;

use linfa::{Float, ParamGuard};
use linfa_trees::{DecisionTree, DecisionTreeParams};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::dataset::ClassLabel;
use crate::ensemble::RusBoost;
use crate::error::{ImbalanceError, Result};
use crate::strategy::SamplingStrategy;
use crate::under_sampling::RandomUnderSamplerValidParams;

/// Variant of the multi-class AdaBoost update
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoostingAlgorithm {
    /// Discrete SAMME, members vote with their predicted label
    Samme,
    /// Real SAMME.R, members contribute their class probabilities
    SammeR,
}

impl Default for BoostingAlgorithm {
    fn default() -> Self {
        BoostingAlgorithm::SammeR
    }
}

/// A verified hyper-parameter set ready for RUSBoost
///
/// See [`RusBoostParams`] for more information.
#[derive(Clone, Debug, PartialEq)]
pub struct RusBoostValidParams<F, L, W = DecisionTreeParams<F, L>> {
    pub(crate) weak_learner: W,
    pub(crate) n_estimators: usize,
    pub(crate) learning_rate: f64,
    pub(crate) algorithm: BoostingAlgorithm,
    pub(crate) sampling_strategy: SamplingStrategy<L>,
    pub(crate) replacement: bool,
    pub(crate) seed: u64,
    pub(crate) phantom: PhantomData<F>,
}

impl<F: Float, L: ClassLabel, W> RusBoostValidParams<F, L, W> {
    pub fn weak_learner(&self) -> &W {
        &self.weak_learner
    }

    pub fn n_estimators(&self) -> usize {
        self.n_estimators
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn algorithm(&self) -> BoostingAlgorithm {
        self.algorithm
    }

    pub fn sampling_strategy(&self) -> &SamplingStrategy<L> {
        &self.sampling_strategy
    }

    pub fn replacement(&self) -> bool {
        self.replacement
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Under-sampler of the boosting round with the given seed
    pub(crate) fn sampler(&self, seed: u64) -> RandomUnderSamplerValidParams<F, L> {
        RandomUnderSamplerValidParams {
            sampling_strategy: self.sampling_strategy.clone(),
            replacement: self.replacement,
            seed,
            phantom: PhantomData,
        }
    }
}

/// RUSBoost hyper-parameters
///
/// RUSBoost is AdaBoost where every weak learner is fitted on a randomly under-sampled copy
/// of the dataset. The sample weights are carried over to the drawn samples while the
/// boosting error and the weight update are computed on the full dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct RusBoostParams<F, L, W = DecisionTreeParams<F, L>>(
    pub(crate) RusBoostValidParams<F, L, W>,
);

impl<F: Float, L: ClassLabel> RusBoostParams<F, L> {
    pub fn new() -> Self {
        Self::with_weak_learner(DecisionTree::params().max_depth(Some(1)))
    }
}

impl<F: Float, L: ClassLabel> Default for RusBoostParams<F, L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float, L: ClassLabel, W> RusBoostParams<F, L, W> {
    /// Boost the given weak learner with the default settings
    pub fn with_weak_learner(weak_learner: W) -> Self {
        Self(RusBoostValidParams {
            weak_learner,
            n_estimators: 50,
            learning_rate: 1.0,
            algorithm: BoostingAlgorithm::SammeR,
            sampling_strategy: SamplingStrategy::Auto,
            replacement: false,
            seed: 42,
            phantom: PhantomData,
        })
    }

    /// Replace the weak learner
    pub fn weak_learner<W2>(self, weak_learner: W2) -> RusBoostParams<F, L, W2> {
        let RusBoostValidParams {
            n_estimators,
            learning_rate,
            algorithm,
            sampling_strategy,
            replacement,
            seed,
            ..
        } = self.0;

        RusBoostParams(RusBoostValidParams {
            weak_learner,
            n_estimators,
            learning_rate,
            algorithm,
            sampling_strategy,
            replacement,
            seed,
            phantom: PhantomData,
        })
    }

    /// Maximal number of boosting rounds, defaults to `50`
    pub fn n_estimators(mut self, n_estimators: usize) -> Self {
        self.0.n_estimators = n_estimators;
        self
    }

    /// Shrinks the contribution of every member, defaults to `1.0`
    pub fn learning_rate(mut self, learning_rate: f64) -> Self {
        self.0.learning_rate = learning_rate;
        self
    }

    pub fn algorithm(mut self, algorithm: BoostingAlgorithm) -> Self {
        self.0.algorithm = algorithm;
        self
    }

    /// Classes under-sampled before fitting a member, defaults to [`SamplingStrategy::Auto`]
    pub fn sampling_strategy<S: Into<SamplingStrategy<L>>>(mut self, sampling_strategy: S) -> Self {
        self.0.sampling_strategy = sampling_strategy.into();
        self
    }

    /// Under-sample with replacement, defaults to `false`
    pub fn replacement(mut self, replacement: bool) -> Self {
        self.0.replacement = replacement;
        self
    }

    /// Master seed from which the seed of every boosting round is derived
    pub fn seed(mut self, seed: u64) -> Self {
        self.0.seed = seed;
        self
    }
}

impl<F: Float, L: ClassLabel> RusBoost<F, L> {
    /// Defaults are provided if the optional parameters are not specified:
    /// * `weak_learner = DecisionTree::params().max_depth(Some(1))`
    /// * `n_estimators = 50`
    /// * `learning_rate = 1.0`
    /// * `algorithm = BoostingAlgorithm::SammeR`
    /// * `sampling_strategy = SamplingStrategy::Auto`
    /// * `replacement = false`
    /// * `seed = 42`
    // Violates the convention that new should return a value of type `Self`
    #[allow(clippy::new_ret_no_self)]
    pub fn params() -> RusBoostParams<F, L> {
        RusBoostParams::new()
    }
}

impl<F: Float, L: ClassLabel, W> ParamGuard for RusBoostParams<F, L, W> {
    type Checked = RusBoostValidParams<F, L, W>;
    type Error = ImbalanceError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        if self.0.n_estimators == 0 {
            return Err(ImbalanceError::InvalidEstimators);
        }
        if !(self.0.learning_rate > 0.0 && self.0.learning_rate.is_finite()) {
            return Err(ImbalanceError::InvalidLearningRate(self.0.learning_rate));
        }
        self.0.sampling_strategy.check()?;

        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}
