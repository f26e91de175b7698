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
use crate::under_sampling::EditedNearestNeighbours;

/// A verified hyper-parameter set ready for edited nearest neighbour cleaning
///
/// See [`EditedNearestNeighboursParams`] for more information.
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
pub struct EditedNearestNeighboursValidParams<F, L> {
    pub(crate) n_neighbors: KNeighbours,
    pub(crate) kind_sel: SelectionKind,
    pub(crate) sampling_strategy: SamplingStrategy<L>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) phantom: PhantomData<F>,
}

impl<F: Float, L: ClassLabel> EditedNearestNeighboursValidParams<F, L> {
    pub fn n_neighbors(&self) -> &KNeighbours {
        &self.n_neighbors
    }

    pub fn kind_sel(&self) -> SelectionKind {
        self.kind_sel
    }

    pub fn sampling_strategy(&self) -> &SamplingStrategy<L> {
        &self.sampling_strategy
    }
}

/// Edited nearest neighbours hyper-parameters
///
/// Samples whose neighbourhood disagrees with their own label are removed from the classes
/// selected by the sampling strategy.
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
pub struct EditedNearestNeighboursParams<F, L>(pub(crate) EditedNearestNeighboursValidParams<F, L>);

impl<F: Float, L: ClassLabel> EditedNearestNeighboursParams<F, L> {
    pub fn new() -> Self {
        Self(EditedNearestNeighboursValidParams {
            n_neighbors: KNeighbours::new(3),
            kind_sel: SelectionKind::All,
            sampling_strategy: SamplingStrategy::Auto,
            phantom: PhantomData,
        })
    }

    /// Size of the neighbourhood, either a number or a configured [`KNeighbours`]
    ///
    /// Defaults to `3`.
    pub fn n_neighbors<K: Into<KNeighbours>>(mut self, n_neighbors: K) -> Self {
        self.0.n_neighbors = n_neighbors.into();
        self
    }

    /// Nearest neighbour algorithm searching the neighbourhood, keeps the neighbourhood size
    pub fn nn_algo(mut self, nn_algo: CommonNearestNeighbour) -> Self {
        self.0.n_neighbors.nn_algo = nn_algo;
        self
    }

    /// Defaults to [`SelectionKind::All`]
    pub fn kind_sel(mut self, kind_sel: SelectionKind) -> Self {
        self.0.kind_sel = kind_sel;
        self
    }

    /// Classes to clean
    ///
    /// Defaults to [`SamplingStrategy::Auto`], cleaning every class but the minority.
    pub fn sampling_strategy<S: Into<SamplingStrategy<L>>>(mut self, sampling_strategy: S) -> Self {
        self.0.sampling_strategy = sampling_strategy.into();
        self
    }
}

impl<F: Float, L: ClassLabel> Default for EditedNearestNeighboursParams<F, L> {
    fn default() -> Self {
        Self::new()
    }
}

impl EditedNearestNeighbours {
    /// Defaults are provided if the optional parameters are not specified:
    /// * `n_neighbors = 3`
    /// * `kind_sel = SelectionKind::All`
    /// * `sampling_strategy = SamplingStrategy::Auto`
    /// * `nn_algo = KdTree`
    // Violates the convention that new should return a value of type `Self`
    #[allow(clippy::new_ret_no_self)]
    pub fn params<F: Float, L: ClassLabel>() -> EditedNearestNeighboursParams<F, L> {
        EditedNearestNeighboursParams::new()
    }
}

impl<F: Float, L: ClassLabel> ParamGuard for EditedNearestNeighboursParams<F, L> {
    type Checked = EditedNearestNeighboursValidParams<F, L>;
    type Error = ImbalanceError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        self.0.n_neighbors.check()?;
        self.0.sampling_strategy.check()?;
        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}
