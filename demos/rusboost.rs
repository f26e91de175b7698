use linfa::prelude::*;
use linfa_imbalance::metrics::{geometric_mean_score, sensitivity_specificity_support};
use linfa_imbalance::prelude::*;
use linfa_imbalance::Result;
use ndarray::{Array1, Array2, Ix1};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;

fn imbalanced(n: usize, rng: &mut Xoshiro256Plus) -> Dataset<f64, usize, Ix1> {
    let n_minority = n / 20;
    let targets: Array1<usize> = (0..n).map(|i| (i < n_minority) as usize).collect();
    let records = Array2::from_shape_fn((n, 3), |(i, j)| {
        let offset = if i < n_minority && j < 2 { 1.2 } else { 0.0 };
        offset + rng.gen_range(-1.0..1.0)
    });

    Dataset::new(records, targets)
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = Xoshiro256Plus::seed_from_u64(42);
    let train = imbalanced(2000, &mut rng);
    let test = imbalanced(1000, &mut rng);

    for algorithm in [BoostingAlgorithm::Samme, BoostingAlgorithm::SammeR].iter() {
        println!("Training RUSBoost with {:?} ...", algorithm);
        let model = RusBoost::params()
            .n_estimators(30)
            .algorithm(*algorithm)
            .fit(&train)?;

        let predictions = model.predict(&test);
        let scores = sensitivity_specificity_support(test.targets(), &predictions)?;
        println!("members:     {}", model.n_estimators());
        println!("accuracy:    {:.3}", model.score(&test)?);
        println!("sensitivity: {:.3}", scores.sensitivity());
        println!("specificity: {:.3}", scores.specificity());
        println!(
            "g-mean:      {:.3}",
            geometric_mean_score(test.targets(), &predictions, None)?
        );
        println!("importances: {:.3}", model.feature_importances());
    }

    Ok(())
}
