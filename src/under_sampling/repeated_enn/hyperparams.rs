use std::marker::PhantomData;

use linfa::{Float, ParamGuard};
use linfa_nn::CommonNearestNeighbour;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::dataset::ClassLabel;
use crate::error::{ImbalanceError, Result};
use crate::neighbours::KNeighbours;
use crate::selection::SelectionKind;
use crate::strategy::SamplingStrategy;
use crate::under_sampling::RepeatedEditedNearestNeighbours;

/// A verified hyper-parameter set ready for repeated edited nearest neighbour cleaning
///
/// See [`RepeatedEditedNearestNeighboursParams`] for more information.
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
pub struct RepeatedEditedNearestNeighboursValidParams<F, L> {
    pub(crate) n_neighbors: KNeighbours,
    pub(crate) kind_sel: SelectionKind,
    pub(crate) sampling_strategy: SamplingStrategy<L>,
    pub(crate) max_iter: usize,
    pub(crate) allow_minority: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) phantom: PhantomData<F>,
}

impl<F: Float, L: ClassLabel> RepeatedEditedNearestNeighboursValidParams<F, L> {
    pub fn n_neighbors(&self) -> &KNeighbours {
        &self.n_neighbors
    }

    pub fn kind_sel(&self) -> SelectionKind {
        self.kind_sel
    }

    pub fn sampling_strategy(&self) -> &SamplingStrategy<L> {
        &self.sampling_strategy
    }

    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    pub fn allow_minority(&self) -> bool {
        self.allow_minority
    }
}

/// Repeated edited nearest neighbours hyper-parameters
///
/// Edited nearest neighbour passes with a fixed neighbourhood size are repeated on the
/// surviving samples until a pass removes nothing or `max_iter` passes were applied.
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
pub struct RepeatedEditedNearestNeighboursParams<F, L>(
    pub(crate) RepeatedEditedNearestNeighboursValidParams<F, L>,
);

impl<F: Float, L: ClassLabel> RepeatedEditedNearestNeighboursParams<F, L> {
    pub fn new() -> Self {
        Self(RepeatedEditedNearestNeighboursValidParams {
            n_neighbors: KNeighbours::new(3),
            kind_sel: SelectionKind::All,
            sampling_strategy: SamplingStrategy::Auto,
            max_iter: 100,
            allow_minority: false,
            phantom: PhantomData,
        })
    }

    /// Size of the neighbourhood in every pass
    pub fn n_neighbors<K: Into<KNeighbours>>(mut self, n_neighbors: K) -> Self {
        self.0.n_neighbors = n_neighbors.into();
        self
    }

    pub fn nn_algo(mut self, nn_algo: CommonNearestNeighbour) -> Self {
        self.0.n_neighbors.nn_algo = nn_algo;
        self
    }

    pub fn kind_sel(mut self, kind_sel: SelectionKind) -> Self {
        self.0.kind_sel = kind_sel;
        self
    }

    /// Classes to clean, re-evaluated before every pass
    pub fn sampling_strategy<S: Into<SamplingStrategy<L>>>(mut self, sampling_strategy: S) -> Self {
        self.0.sampling_strategy = sampling_strategy.into();
        self
    }

    /// Maximum number of passes
    ///
    /// Defaults to `100`, must be greater than zero.
    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.0.max_iter = max_iter;
        self
    }

    /// Revert and stop at the first pass which shrinks a class below the size of the initial
    /// minority class
    pub fn allow_minority(mut self, allow_minority: bool) -> Self {
        self.0.allow_minority = allow_minority;
        self
    }
}

impl<F: Float, L: ClassLabel> Default for RepeatedEditedNearestNeighboursParams<F, L> {
    fn default() -> Self {
        Self::new()
    }
}

impl RepeatedEditedNearestNeighbours {
    /// Defaults are provided if the optional parameters are not specified:
    /// * `n_neighbors = 3`
    /// * `kind_sel = SelectionKind::All`
    /// * `sampling_strategy = SamplingStrategy::Auto`
    /// * `max_iter = 100`
    /// * `allow_minority = false`
    // Violates the convention that new should return a value of type `Self`
    #[allow(clippy::new_ret_no_self)]
    pub fn params<F: Float, L: ClassLabel>() -> RepeatedEditedNearestNeighboursParams<F, L> {
        RepeatedEditedNearestNeighboursParams::new()
    }
}

impl<F: Float, L: ClassLabel> ParamGuard for RepeatedEditedNearestNeighboursParams<F, L> {
    type Checked = RepeatedEditedNearestNeighboursValidParams<F, L>;
    type Error = ImbalanceError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        if self.0.max_iter == 0 {
            return Err(ImbalanceError::InvalidMaxIter);
        }
        self.0.n_neighbors.check()?;
        self.0.sampling_strategy.check()?;

        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}
