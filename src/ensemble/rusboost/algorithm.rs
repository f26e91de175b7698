use linfa::dataset::{AsSingleTargets, DatasetBase};
use linfa::traits::{Fit, PredictInplace};
use linfa::Float;
use log::{debug, warn};
use ndarray::{Array1, Array2, ArrayBase, ArrayView1, ArrayView2, Data, Ix2, Zip};
use rand::{RngCore, SeedableRng};
use rand_xoshiro::SplitMix64;

use super::hyperparams::{BoostingAlgorithm, RusBoostValidParams};
use crate::dataset::{check_shapes, ClassCounts, ClassLabel};
use crate::ensemble::{one_hot, TreeEstimator, WeakEstimator, WeakLearner};
use crate::error::{ImbalanceError, Result};
use crate::traits::FitResample;
use crate::under_sampling::RandomUnderSamplerValidParams;

/// A fitted member of the ensemble together with the under-sampler which drew its sample
#[derive(Debug)]
pub struct EnsembleMember<F, L, E> {
    sampler: RandomUnderSamplerValidParams<F, L>,
    estimator: E,
    weight: F,
    error: F,
    seed: u64,
}

impl<F: Float, L: ClassLabel, E> EnsembleMember<F, L, E> {
    pub fn sampler(&self) -> &RandomUnderSamplerValidParams<F, L> {
        &self.sampler
    }

    pub fn estimator(&self) -> &E {
        &self.estimator
    }

    /// Weight of the member's vote
    pub fn weight(&self) -> F {
        self.weight
    }

    /// Weighted training error at the time the member was fitted
    pub fn error(&self) -> F {
        self.error
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

/// A fitted RUSBoost ensemble
///
/// ## Algorithm
///
/// With `n` samples and `K` classes, every sample starts with weight `1/n`. Each boosting
/// round then
/// 1. draws a random under-sample of the dataset with a seed derived from the master seed,
/// 2. fits the weak learner on the drawn samples with their current weights,
/// 3. computes the weighted error of the member on the full dataset,
/// 4. stops early if the member is perfect or no better than chance (`1 - 1/K`),
/// 5. updates and normalises the sample weights with the SAMME or SAMME.R rule.
///
/// ## Prediction
///
/// SAMME members vote with their weight for the predicted class. SAMME.R members contribute
/// `(K - 1) * (ln p - mean(ln p))` of their class probabilities `p`. The class with the highest
/// averaged score is predicted.
///
/// ## Example
///
/// ```no_run
/// use linfa::prelude::*;
/// use linfa_imbalance::ensemble::RusBoost;
/// use ndarray::{array, Array1};
///
/// let records = Array1::linspace(0., 10., 40).into_shape((40, 1)).unwrap();
/// let targets = records.column(0).mapv(|x| (x > 8.) as usize);
/// let dataset = Dataset::new(records, targets);
///
/// let model = RusBoost::params().n_estimators(10).fit(&dataset).unwrap();
/// let predictions = model.predict(&array![[1.], [9.5]]);
/// ```
///
/// ## References
///
/// * Seiffert, C., Khoshgoftaar, T. M., Van Hulse, J., & Napolitano, A. (2010). RUSBoost: A
///   hybrid approach to alleviating class imbalance. IEEE Transactions on Systems, Man, and
///   Cybernetics, 40(1), 185-197.
/// * Zhu, J., Zou, H., Rosset, S., & Hastie, T. (2009). Multi-class AdaBoost. Statistics and
///   its Interface, 2(3), 349-360.
#[derive(Debug)]
pub struct RusBoost<F: Float, L: ClassLabel, E = TreeEstimator<F, L>> {
    classes: Vec<L>,
    n_features: usize,
    algorithm: BoostingAlgorithm,
    members: Vec<EnsembleMember<F, L, E>>,
}

fn argmax<F: Float>(row: ArrayView1<F>) -> usize {
    let mut best = 0;
    for (idx, &value) in row.iter().enumerate() {
        if value > row[best] {
            best = idx;
        }
    }

    best
}

/// Symmetric log-probabilities of a SAMME.R member
fn samme_proba<F: Float>(mut proba: Array2<F>) -> Array2<F> {
    let k = F::cast(proba.ncols());
    for mut row in proba.rows_mut() {
        row.mapv_inplace(|p| p.max(F::epsilon()).ln());
        let mean = row.mean().unwrap_or_else(F::zero);
        row.mapv_inplace(|log_p| (k - F::one()) * (log_p - mean));
    }

    proba
}

impl<F: Float, L: ClassLabel, E: WeakEstimator<F, L>> RusBoost<F, L, E> {
    /// Labels seen during fit in ascending order, the column order of probabilities
    pub fn classes(&self) -> &[L] {
        &self.classes
    }

    pub fn algorithm(&self) -> BoostingAlgorithm {
        self.algorithm
    }

    /// Number of fitted members, may be smaller than requested after an early stop
    pub fn n_estimators(&self) -> usize {
        self.members.len()
    }

    pub fn members(&self) -> &[EnsembleMember<F, L, E>] {
        &self.members
    }

    pub fn estimator_weights(&self) -> Array1<F> {
        self.members.iter().map(|member| member.weight).collect()
    }

    pub fn estimator_errors(&self) -> Array1<F> {
        self.members.iter().map(|member| member.error).collect()
    }

    fn check_features(&self, records: &ArrayView2<F>) -> Result<()> {
        if records.ncols() != self.n_features {
            return Err(ImbalanceError::FeatureMismatch {
                expected: self.n_features,
                found: records.ncols(),
            });
        }

        Ok(())
    }

    fn total_weight(&self) -> F {
        self.members.iter().map(|member| member.weight).sum()
    }

    fn decision_view(&self, records: ArrayView2<F>) -> Array2<F> {
        let mut decision = Array2::zeros((records.nrows(), self.classes.len()));
        for member in &self.members {
            match self.algorithm {
                BoostingAlgorithm::Samme => {
                    let votes: Array2<F> =
                        one_hot(&member.estimator.predict_labels(records), &self.classes);
                    decision.scaled_add(member.weight, &votes);
                }
                BoostingAlgorithm::SammeR => {
                    decision += &samme_proba(member.estimator.predict_proba(records));
                }
            }
        }

        let total = self.total_weight();
        if total > F::zero() {
            decision /= total;
        }

        decision
    }

    fn predict_view(&self, records: ArrayView2<F>) -> Array1<L> {
        self.decision_view(records)
            .rows()
            .into_iter()
            .map(|row| self.classes[argmax(row)].clone())
            .collect()
    }

    /// Averaged class scores of the members, one column per class
    pub fn decision_function<D: Data<Elem = F>>(&self, records: &ArrayBase<D, Ix2>) -> Result<Array2<F>> {
        let records = records.view();
        self.check_features(&records)?;

        Ok(self.decision_view(records))
    }

    /// Class membership probabilities, one column per class
    pub fn predict_proba<D: Data<Elem = F>>(&self, records: &ArrayBase<D, Ix2>) -> Result<Array2<F>> {
        let records = records.view();
        self.check_features(&records)?;

        let k = F::cast(self.classes.len());
        let mut proba = match self.algorithm {
            BoostingAlgorithm::SammeR => self.decision_view(records),
            BoostingAlgorithm::Samme => {
                let mut proba = Array2::zeros((records.nrows(), self.classes.len()));
                for member in &self.members {
                    proba.scaled_add(member.weight, &member.estimator.predict_proba(records));
                }
                let total = self.total_weight();
                if total > F::zero() {
                    proba /= total;
                }
                proba
            }
        };

        proba.mapv_inplace(|score| (score / (k - F::one())).exp());
        for mut row in proba.rows_mut() {
            let total = row.sum();
            if total > F::zero() {
                row /= total;
            }
        }

        Ok(proba)
    }

    /// Mean accuracy on a labelled dataset
    pub fn score<D, T>(&self, dataset: &DatasetBase<ArrayBase<D, Ix2>, T>) -> Result<F>
    where
        D: Data<Elem = F>,
        T: AsSingleTargets<Elem = L>,
    {
        let records = dataset.records().view();
        let targets = dataset.targets().as_single_targets();
        check_shapes(&records, &targets)?;
        self.check_features(&records)?;
        if targets.is_empty() {
            return Ok(F::zero());
        }

        let correct = self
            .predict_view(records)
            .iter()
            .zip(targets.iter())
            .filter(|(predicted, actual)| predicted == actual)
            .count();

        Ok(F::cast(correct) / F::cast(targets.len()))
    }

    /// Weighted mean of the members' feature importances
    pub fn feature_importances(&self) -> Array1<F> {
        let mut importance = Array1::zeros(self.n_features);
        for member in &self.members {
            importance.scaled_add(member.weight, &member.estimator.feature_importance());
        }

        let total = importance.sum();
        if total > F::zero() {
            importance /= total;
        }

        importance
    }
}

impl<F, L, E, D> PredictInplace<ArrayBase<D, Ix2>, Array1<L>> for RusBoost<F, L, E>
where
    F: Float,
    L: ClassLabel + Default,
    E: WeakEstimator<F, L>,
    D: Data<Elem = F>,
{
    fn predict_inplace(&self, x: &ArrayBase<D, Ix2>, y: &mut Array1<L>) {
        assert_eq!(
            x.nrows(),
            y.len(),
            "The number of data points must match the number of output targets."
        );
        assert_eq!(
            x.ncols(),
            self.n_features,
            "The number of features must match the one seen during fit."
        );

        y.assign(&self.predict_view(x.view()));
    }

    fn default_target(&self, x: &ArrayBase<D, Ix2>) -> Array1<L> {
        Array1::default(x.nrows())
    }
}

impl<F: Float, L: ClassLabel, W: WeakLearner<F, L>> RusBoostValidParams<F, L, W> {
    fn fit_view(
        &self,
        records: ArrayView2<F>,
        targets: ArrayView1<L>,
    ) -> Result<RusBoost<F, L, W::Estimator>> {
        let counts = ClassCounts::from_targets(targets.iter());
        if counts.n_classes() < 2 {
            warn!(
                "boosting requires at least two classes, found {}",
                counts.n_classes()
            );
            return Err(ImbalanceError::NotEnoughClasses(counts.n_classes()));
        }

        let classes: Vec<L> = counts.labels().cloned().collect();
        let n_classes = F::cast(classes.len());
        let learning_rate = F::cast(self.learning_rate);
        let mut sample_weight = Array1::from_elem(targets.len(), F::one() / F::cast(targets.len()));
        let mut members = Vec::with_capacity(self.n_estimators);
        // one stream per fit, every round draws its own seed from it
        let mut seeds = SplitMix64::seed_from_u64(self.seed);

        for round in 0..self.n_estimators {
            let seed = seeds.next_u64();
            let sampler = self.sampler(seed);
            let drawn = sampler.fit_resample_view(records, targets)?;

            let rows: Vec<usize> = drawn.sample_indices().iter().flatten().copied().collect();
            let drawn_weight: Array1<F> = rows.iter().map(|&row| sample_weight[row]).collect();
            let mean = drawn_weight.mean().unwrap_or_else(F::zero);
            if !(mean > F::zero()) {
                warn!("weights of the drawn samples vanished in round {}", round);
                break;
            }
            // trees compare absolute weights against their minimal leaf weight
            let drawn_weight = drawn_weight.mapv(|w| (w / mean).to_f32().unwrap_or(0.0));
            let (dataset, _) = drawn.into_parts();
            let dataset = dataset.with_weights(drawn_weight);

            let estimator = self.weak_learner.fit_weighted(&dataset, &classes, seed)?;

            let predictions = estimator.predict_labels(records);
            let incorrect: Array1<bool> = Zip::from(&predictions)
                .and(&targets)
                .map_collect(|predicted, actual| predicted != actual);
            let error = Zip::from(&incorrect)
                .and(&sample_weight)
                .fold(F::zero(), |acc, &miss, &w| if miss { acc + w } else { acc })
                / sample_weight.sum();

            if error <= F::zero() {
                debug!("member of round {} fits the training data perfectly", round);
                members.push(EnsembleMember {
                    sampler,
                    estimator,
                    weight: F::one(),
                    error: F::zero(),
                    seed,
                });
                break;
            }

            if error >= F::one() - F::one() / n_classes {
                warn!(
                    "member of round {} is no better than chance with error {}",
                    round, error
                );
                if members.is_empty() {
                    return Err(ImbalanceError::WeakLearnerTooWeak);
                }
                break;
            }

            let last = round + 1 == self.n_estimators;
            let weight = match self.algorithm {
                BoostingAlgorithm::Samme => {
                    let alpha = learning_rate
                        * (((F::one() - error) / error).ln() + (n_classes - F::one()).ln());
                    if !last {
                        let boost = alpha.exp();
                        Zip::from(&mut sample_weight)
                            .and(&incorrect)
                            .for_each(|w, &miss| {
                                if miss && *w > F::zero() {
                                    *w *= boost;
                                }
                            });
                    }
                    alpha
                }
                BoostingAlgorithm::SammeR => {
                    if !last {
                        let proba = estimator.predict_proba(records);
                        let factor = -learning_rate * (n_classes - F::one()) / n_classes;
                        let off_class = -F::one() / (n_classes - F::one());
                        for ((w, row), actual) in sample_weight
                            .iter_mut()
                            .zip(proba.rows())
                            .zip(targets.iter())
                        {
                            if *w <= F::zero() {
                                continue;
                            }
                            let agreement: F = row
                                .iter()
                                .zip(classes.iter())
                                .map(|(&p, class)| {
                                    let coding = if class == actual { F::one() } else { off_class };
                                    coding * p.max(F::epsilon()).ln()
                                })
                                .sum();
                            *w *= (factor * agreement).exp();
                        }
                    }
                    F::one()
                }
            };

            debug!(
                "round {} fitted on {} samples with error {} and weight {}",
                round,
                rows.len(),
                error,
                weight
            );
            members.push(EnsembleMember {
                sampler,
                estimator,
                weight,
                error,
                seed,
            });

            if !last {
                let total = sample_weight.sum();
                if !(total > F::zero() && total.is_finite()) {
                    warn!("sample weights degenerated after round {}", round);
                    break;
                }
                sample_weight /= total;
            }
        }

        if members.is_empty() {
            return Err(ImbalanceError::WeakLearnerTooWeak);
        }

        Ok(RusBoost {
            classes,
            n_features: records.ncols(),
            algorithm: self.algorithm,
            members,
        })
    }
}

impl<F, L, W, D, T> Fit<ArrayBase<D, Ix2>, T, ImbalanceError> for RusBoostValidParams<F, L, W>
where
    F: Float,
    L: ClassLabel,
    W: WeakLearner<F, L>,
    D: Data<Elem = F>,
    T: AsSingleTargets<Elem = L>,
{
    type Object = RusBoost<F, L, W::Estimator>;

    fn fit(&self, dataset: &DatasetBase<ArrayBase<D, Ix2>, T>) -> Result<Self::Object> {
        let records = dataset.records().view();
        let targets = dataset.targets().as_single_targets();
        check_shapes(&records, &targets)?;

        self.fit_view(records, targets)
    }
}
