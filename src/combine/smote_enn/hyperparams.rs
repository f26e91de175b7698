use linfa::{Float, ParamGuard};

use crate::combine::SmoteEnn;
use crate::dataset::ClassLabel;
use crate::error::{ImbalanceError, Result};
use crate::neighbours::KNeighbours;
use crate::over_sampling::SmoteParams;
use crate::strategy::SamplingStrategy;
use crate::under_sampling::EditedNearestNeighboursParams;

/// A verified hyper-parameter set ready for SMOTE followed by cleaning
///
/// See [`SmoteEnnParams`] for more information.
#[derive(Clone, Debug, PartialEq)]
pub struct SmoteEnnValidParams<F, L, C = EditedNearestNeighboursParams<F, L>> {
    pub(crate) smote: SmoteParams<F, L>,
    pub(crate) cleaner: C,
}

impl<F: Float, L: ClassLabel, C> SmoteEnnValidParams<F, L, C> {
    pub fn smote(&self) -> &SmoteParams<F, L> {
        &self.smote
    }

    pub fn cleaner(&self) -> &C {
        &self.cleaner
    }
}

/// SMOTE + ENN hyper-parameters
///
/// Over-samples with SMOTE, then removes noisy samples from the over-sampled dataset with a
/// cleaning method. The cleaner defaults to [`EditedNearestNeighbours`] and can be replaced
/// by any type implementing [`FitResample`](crate::FitResample).
///
/// [`EditedNearestNeighbours`]: crate::under_sampling::EditedNearestNeighbours
#[derive(Clone, Debug, PartialEq)]
pub struct SmoteEnnParams<F, L, C = EditedNearestNeighboursParams<F, L>>(
    pub(crate) SmoteEnnValidParams<F, L, C>,
);

impl<F: Float, L: ClassLabel> SmoteEnnParams<F, L> {
    pub fn new() -> Self {
        Self(SmoteEnnValidParams {
            smote: SmoteParams::new(),
            cleaner: EditedNearestNeighboursParams::new(),
        })
    }
}

impl<F: Float, L: ClassLabel> Default for SmoteEnnParams<F, L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float, L: ClassLabel, C> SmoteEnnParams<F, L, C> {
    /// Number of samples the classes are over-sampled to, see [`SmoteParams::sampling_strategy`]
    pub fn sampling_strategy<S: Into<SamplingStrategy<L>>>(mut self, sampling_strategy: S) -> Self {
        self.0.smote = self.0.smote.sampling_strategy(sampling_strategy);
        self
    }

    /// Seed of the over-sampler
    pub fn seed(mut self, seed: u64) -> Self {
        self.0.smote = self.0.smote.seed(seed);
        self
    }

    /// Neighbourhood of the over-sampler
    pub fn k_neighbors<K: Into<KNeighbours>>(mut self, k_neighbors: K) -> Self {
        self.0.smote = self.0.smote.k_neighbors(k_neighbors);
        self
    }

    /// Replace the over-sampler hyper-parameters
    pub fn smote(mut self, smote: SmoteParams<F, L>) -> Self {
        self.0.smote = smote;
        self
    }

    /// Replace the cleaning method
    pub fn cleaner<C2>(self, cleaner: C2) -> SmoteEnnParams<F, L, C2> {
        SmoteEnnParams(SmoteEnnValidParams {
            smote: self.0.smote,
            cleaner,
        })
    }
}

impl<F: Float, L: ClassLabel> SmoteEnn<F, L> {
    /// Defaults are provided if the optional parameters are not specified:
    /// * `smote = Smote::params()`
    /// * `cleaner = EditedNearestNeighbours::params()`
    // Violates the convention that new should return a value of type `Self`
    #[allow(clippy::new_ret_no_self)]
    pub fn params() -> SmoteEnnParams<F, L> {
        SmoteEnnParams::new()
    }
}

impl<F: Float, L: ClassLabel, C> ParamGuard for SmoteEnnParams<F, L, C> {
    type Checked = SmoteEnnValidParams<F, L, C>;
    type Error = ImbalanceError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        self.0.smote.check_ref()?;
        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}
