use linfa::prelude::*;
use linfa_imbalance::prelude::*;
use linfa_imbalance::Result;
use ndarray::{Array1, Array2};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;

fn main() -> Result<()> {
    env_logger::init();

    // three classes along a line, their borders overlap
    let mut rng = Xoshiro256Plus::seed_from_u64(42);
    let targets: Array1<usize> = (0..300)
        .map(|i| match i {
            0..=199 => 0,
            200..=269 => 1,
            _ => 2,
        })
        .collect();
    let records = Array2::from_shape_fn((300, 2), |(i, j)| {
        let offset = if j == 0 { 1.5 * targets[i] as f64 } else { 0.0 };
        offset + rng.gen_range(-1.0..1.0)
    });
    let dataset = Dataset::new(records, targets);

    let show = |name: &str, resampled: &Resampled<f64, usize>| {
        let counts = ClassCounts::from_targets(resampled.targets().iter());
        println!("{:>10}: {:?}", name, counts.iter().collect::<Vec<_>>());
    };

    let original = ClassCounts::from_targets(dataset.targets().iter());
    println!("{:>10}: {:?}", "original", original.iter().collect::<Vec<_>>());

    show("enn", &EditedNearestNeighbours::params().fit_resample(&dataset)?);

    let outcome = RepeatedEditedNearestNeighbours::params().clean(&dataset)?;
    println!(
        "repeated enn stopped after {} passes ({:?})",
        outcome.n_passes(),
        outcome.termination()
    );
    show("renn", outcome.resampled());

    let outcome = AllKnn::params()
        .n_neighbors(5usize)
        .kind_sel(SelectionKind::Mode)
        .clean(&dataset)?;
    println!(
        "all knn stopped after {} passes ({:?})",
        outcome.n_passes(),
        outcome.termination()
    );
    show("all knn", outcome.resampled());

    show(
        "random",
        &RandomUnderSampler::params().seed(7).fit_resample(&dataset)?,
    );

    Ok(())
}
