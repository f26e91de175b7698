//! Sampling strategies and their resolution against class statistics
//!
use std::collections::BTreeMap;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::dataset::{label_name, ClassCounts, ClassLabel};
use crate::error::{ImbalanceError, Result};

/// Describes which classes are resampled and how many samples they end up with
///
/// The literal strategies select classes, which are then brought to the size of the majority
/// class when over-sampling or to the size of the minority class when under-sampling. A
/// [`Fraction`](SamplingStrategy::Fraction) gives the desired ratio between the minority and
/// majority class after resampling and is only defined for binary targets. With
/// [`Targets`](SamplingStrategy::Targets) the final number of samples is given per class.
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
pub enum SamplingStrategy<L> {
    /// Every class but the majority when over-sampling, every class but the minority otherwise
    Auto,
    Minority,
    Majority,
    NotMinority,
    NotMajority,
    All,
    /// Ratio `n_minority / n_majority` after resampling, in `(0, 1]`
    Fraction(f64),
    /// Number of samples per class after resampling
    Targets(BTreeMap<L, usize>),
}

impl<L> Default for SamplingStrategy<L> {
    fn default() -> Self {
        SamplingStrategy::Auto
    }
}

impl<L> From<f64> for SamplingStrategy<L> {
    fn from(ratio: f64) -> Self {
        SamplingStrategy::Fraction(ratio)
    }
}

impl<L> From<BTreeMap<L, usize>> for SamplingStrategy<L> {
    fn from(targets: BTreeMap<L, usize>) -> Self {
        SamplingStrategy::Targets(targets)
    }
}

impl<L> FromStr for SamplingStrategy<L> {
    type Err = ImbalanceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('_', " ").as_str() {
            "auto" => Ok(SamplingStrategy::Auto),
            "minority" => Ok(SamplingStrategy::Minority),
            "majority" => Ok(SamplingStrategy::Majority),
            "not minority" => Ok(SamplingStrategy::NotMinority),
            "not majority" => Ok(SamplingStrategy::NotMajority),
            "all" => Ok(SamplingStrategy::All),
            _ => Err(ImbalanceError::UnknownStrategy(s.to_string())),
        }
    }
}

/// The kind of resampling a strategy is resolved for
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SamplingKind {
    /// Resolves to the number of samples to add per class
    OverSampling,
    /// Resolves to the number of samples to keep per class
    UnderSampling,
    /// Resolves to the classes to clean, the counts are the current class sizes
    Cleaning,
}

impl<L: ClassLabel> SamplingStrategy<L> {
    /// Validates the parts of the strategy which do not depend on the data
    pub(crate) fn check(&self) -> Result<()> {
        match self {
            SamplingStrategy::Fraction(ratio) if !(*ratio > 0.0 && *ratio <= 1.0) => {
                Err(ImbalanceError::InvalidRatio(*ratio))
            }
            _ => Ok(()),
        }
    }

    /// Resolves the strategy against the class statistics of a dataset
    ///
    /// The meaning of the returned counts depends on `kind`, see [`SamplingKind`].
    pub fn resolve(&self, counts: &ClassCounts<L>, kind: SamplingKind) -> Result<BTreeMap<L, usize>> {
        self.check()?;

        let (minority, n_minority) = match counts.minority() {
            Some((label, count)) => (label.clone(), count),
            None => return Ok(BTreeMap::new()),
        };
        let (majority, n_majority) = match counts.majority() {
            Some((label, count)) => (label.clone(), count),
            None => return Ok(BTreeMap::new()),
        };

        let selected: Vec<&L> = match self {
            SamplingStrategy::Auto => match kind {
                SamplingKind::OverSampling => counts.labels().filter(|l| **l != majority).collect(),
                _ => counts.labels().filter(|l| **l != minority).collect(),
            },
            SamplingStrategy::Minority => vec![&minority],
            SamplingStrategy::Majority => vec![&majority],
            SamplingStrategy::NotMinority => counts.labels().filter(|l| **l != minority).collect(),
            SamplingStrategy::NotMajority => counts.labels().filter(|l| **l != majority).collect(),
            SamplingStrategy::All => counts.labels().collect(),
            SamplingStrategy::Fraction(ratio) => {
                return resolve_fraction(*ratio, counts, kind, (&minority, n_minority), (&majority, n_majority));
            }
            SamplingStrategy::Targets(targets) => return resolve_targets(targets, counts, kind),
        };

        let resolved = selected
            .into_iter()
            .map(|label| {
                let count = counts.get(label);
                let n = match kind {
                    SamplingKind::OverSampling => n_majority - count,
                    SamplingKind::UnderSampling => n_minority,
                    SamplingKind::Cleaning => count,
                };
                (label.clone(), n)
            })
            .collect();

        Ok(resolved)
    }
}

fn resolve_fraction<L: ClassLabel>(
    ratio: f64,
    counts: &ClassCounts<L>,
    kind: SamplingKind,
    (minority, n_minority): (&L, usize),
    (majority, n_majority): (&L, usize),
) -> Result<BTreeMap<L, usize>> {
    if counts.n_classes() != 2 {
        return Err(ImbalanceError::FractionNotBinary(counts.n_classes()));
    }

    let mut resolved = BTreeMap::new();
    match kind {
        SamplingKind::OverSampling => {
            let count = counts.get(minority);
            let target = (n_majority as f64 * ratio).floor() as usize;
            if target < count {
                return Err(ImbalanceError::OverSamplingTarget {
                    class: label_name(minority),
                    current: count,
                    target,
                });
            }
            resolved.insert(minority.clone(), target - count);
        }
        SamplingKind::UnderSampling => {
            let target = (n_minority as f64 / ratio).floor() as usize;
            resolved.insert(majority.clone(), target.min(n_majority));
        }
        SamplingKind::Cleaning => {
            resolved.insert(majority.clone(), n_majority);
        }
    }

    Ok(resolved)
}

fn resolve_targets<L: ClassLabel>(
    targets: &BTreeMap<L, usize>,
    counts: &ClassCounts<L>,
    kind: SamplingKind,
) -> Result<BTreeMap<L, usize>> {
    targets
        .iter()
        .map(|(label, &target)| {
            if !counts.contains(label) {
                return Err(ImbalanceError::UnknownClass(label_name(label)));
            }

            let current = counts.get(label);
            let n = match kind {
                SamplingKind::OverSampling if target < current => {
                    return Err(ImbalanceError::OverSamplingTarget {
                        class: label_name(label),
                        current,
                        target,
                    })
                }
                SamplingKind::OverSampling => target - current,
                SamplingKind::UnderSampling if target > current => {
                    return Err(ImbalanceError::UnderSamplingTarget {
                        class: label_name(label),
                        current,
                        target,
                    })
                }
                SamplingKind::UnderSampling => target,
                SamplingKind::Cleaning => current,
            };

            Ok((label.clone(), n))
        })
        .collect()
}
