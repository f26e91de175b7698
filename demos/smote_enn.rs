use linfa::prelude::*;
use linfa_imbalance::prelude::*;
use linfa_imbalance::Result;
use ndarray::{Array1, Array2};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;

fn main() -> Result<()> {
    env_logger::init();

    // 180 samples of class 0 overlapping with 20 samples of class 1
    let mut rng = Xoshiro256Plus::seed_from_u64(42);
    let targets: Array1<usize> = (0..200).map(|i| (i >= 180) as usize).collect();
    let records = Array2::from_shape_fn((200, 2), |(i, _)| {
        let offset = if i >= 180 { 1.0 } else { 0.0 };
        offset + rng.gen_range(-1.0..1.0)
    });
    let dataset = Dataset::new(records, targets);

    let counts = ClassCounts::from_targets(dataset.targets().iter());
    println!("before: {:?}", counts.iter().collect::<Vec<_>>());

    let model = SmoteEnn::params().seed(7).fit(&dataset)?;
    println!(
        "minority {}, majority {}, synthetic samples {:?}",
        model.minority(),
        model.majority(),
        model.smote().n_synthetic()
    );

    let resampled = model.sample(&dataset)?;
    let counts = ClassCounts::from_targets(resampled.targets().iter());
    println!("after:  {:?}", counts.iter().collect::<Vec<_>>());

    let n_synthetic = resampled
        .sample_indices()
        .iter()
        .filter(|index| index.is_none())
        .count();
    println!("{} of {} samples are synthetic", n_synthetic, resampled.nsamples());

    Ok(())
}
