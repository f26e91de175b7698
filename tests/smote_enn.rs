use std::collections::BTreeMap;

use linfa::prelude::*;
use linfa_imbalance::combine::SmoteEnn;
use linfa_imbalance::{FitResample, ImbalanceError, SamplingStrategy, TargetType};
use ndarray::{array, s, Array1, Array2, ArrayView1, Axis, Ix1};

fn binary() -> Dataset<f64, usize, Ix1> {
    let records = array![
        [0.11622591, -0.0317206],
        [0.77481731, 0.60935141],
        [1.25192108, -0.22367336],
        [0.53366841, -0.30312976],
        [1.52091956, -0.49283504],
        [-0.28162401, -2.10400981],
        [0.83680821, 1.72827342],
        [0.3084254, 0.33299982],
        [0.70472253, -0.73309052],
        [0.28893132, -0.38761769],
        [1.15514042, 0.0129463],
        [0.88407872, 0.35454207],
        [1.31301027, -0.92648734],
        [-1.11515198, -0.93689695],
        [-0.18410027, -0.45194484],
        [0.9281014, 0.53085498],
        [-0.14374509, 0.27370049],
        [-0.41635887, -0.38299653],
        [0.08711622, 0.93259929],
        [1.70580611, -0.11219234]
    ];
    let targets = array![0usize, 1, 0, 0, 0, 1, 1, 1, 1, 1, 1, 0, 0, 1, 1, 1, 1, 0, 1, 0];

    Dataset::new(records, targets)
}

/// Smallest box containing every sample of `label`
fn bounding_box(dataset: &Dataset<f64, usize, Ix1>, label: usize) -> (Array1<f64>, Array1<f64>) {
    let rows: Vec<usize> = dataset
        .targets()
        .iter()
        .enumerate()
        .filter(|(_, &l)| l == label)
        .map(|(i, _)| i)
        .collect();
    let class = dataset.records().select(Axis(0), &rows);

    (
        class.fold_axis(Axis(0), f64::INFINITY, |a, &b| a.min(b)),
        class.fold_axis(Axis(0), f64::NEG_INFINITY, |a, &b| a.max(b)),
    )
}

#[test]
fn fit_detects_roles() {
    let dataset = binary();

    let model = SmoteEnn::params().seed(0).fit(&dataset).unwrap();
    assert_eq!(model.minority(), &0);
    assert_eq!(model.majority(), &1);
    assert_eq!(model.class_counts().get(&0), 8);
    assert_eq!(model.class_counts().get(&1), 12);
    assert_eq!(model.target_type(), TargetType::Binary);
}

#[test]
fn sample_regular() {
    let dataset = binary();

    let resampled = SmoteEnn::params().seed(0).fit_resample(&dataset).unwrap();

    assert_eq!(resampled.nsamples(), 15);
    assert_eq!(
        resampled.targets(),
        &array![0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1]
    );

    let originals: Vec<Option<usize>> = vec![0, 2, 3, 4, 11, 12, 17, 19]
        .into_iter()
        .map(Some)
        .collect();
    assert_eq!(&resampled.sample_indices()[..8], originals.as_slice());
    assert_eq!(&resampled.sample_indices()[8..12], &[None::<usize>; 4]);
    assert_eq!(
        &resampled.sample_indices()[12..],
        &[Some(5), Some(6), Some(18)]
    );

    assert_eq!(
        resampled.records().slice(s![..8, ..]),
        dataset.records().select(Axis(0), &[0, 2, 3, 4, 11, 12, 17, 19])
    );
    assert_eq!(
        resampled.records().slice(s![12.., ..]),
        dataset.records().select(Axis(0), &[5, 6, 18])
    );

    // synthetic samples are interpolated between samples of the minority class
    let (lower, upper) = bounding_box(&dataset, 0);
    for row in resampled.records().slice(s![8..12, ..]).rows() {
        for ((&value, &lo), &hi) in row.iter().zip(lower.iter()).zip(upper.iter()) {
            assert!(value >= lo && value <= hi);
        }
    }
}

/// Whether `sample` lies on the segment between `a` and `b`
fn on_segment(sample: ArrayView1<f64>, a: ArrayView1<f64>, b: ArrayView1<f64>) -> bool {
    let mut gap: Option<f64> = None;
    for ((&x, &p), &q) in sample.iter().zip(a.iter()).zip(b.iter()) {
        if x < p.min(q) - 1e-12 || x > p.max(q) + 1e-12 {
            return false;
        }
        if (q - p).abs() > 1e-12 {
            let g = (x - p) / (q - p);
            match gap {
                Some(prev) if (prev - g).abs() > 1e-9 => return false,
                _ => gap = Some(g),
            }
        }
    }
    true
}

/// The `k` rows of `rows` closest to `row`, excluding `row` itself
fn nearest(records: &Array2<f64>, rows: &[usize], row: usize, k: usize) -> Vec<usize> {
    let mut others: Vec<(f64, usize)> = rows
        .iter()
        .filter(|&&other| other != row)
        .map(|&other| {
            let dist = (&records.row(other) - &records.row(row)).mapv(|d| d * d).sum();
            (dist, other)
        })
        .collect();
    others.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
    others.into_iter().take(k).map(|(_, other)| other).collect()
}

#[test]
fn synthetic_samples_lie_between_source_and_neighbour() {
    let dataset = binary();
    let records = dataset.records();
    let minority = [0, 2, 3, 4, 11, 12, 17, 19];

    for seed in 0..5 {
        let resampled = SmoteEnn::params().seed(seed).fit_resample(&dataset).unwrap();

        // the four synthetic samples use the first four minority samples as sources, in order
        let synthetic = resampled.records().slice(s![8..12, ..]);
        for (source, sample) in minority.iter().zip(synthetic.rows()) {
            let neighbours = nearest(records, &minority, *source, 5);
            assert!(
                neighbours
                    .iter()
                    .any(|&n| on_segment(sample, records.row(*source), records.row(n))),
                "sample {} of seed {} is not between row {} and one of its neighbours",
                sample,
                seed,
                source
            );
        }
    }
}

#[test]
fn sample_regular_with_ratio() {
    let dataset = binary();

    let resampled = SmoteEnn::params()
        .sampling_strategy(0.8)
        .seed(0)
        .fit_resample(&dataset)
        .unwrap();

    assert_eq!(resampled.targets(), &array![0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1]);
    assert_eq!(resampled.sample_indices()[8], None);
    assert_eq!(
        &resampled.sample_indices()[9..],
        &[Some(5), Some(6), Some(18)]
    );
}

#[test]
fn same_seed_same_samples() {
    let dataset = binary();
    let params = SmoteEnn::params().seed(11);

    let first = params.fit_resample(&dataset).unwrap();
    let second = params.fit_resample(&dataset).unwrap();
    assert_eq!(first.records(), second.records());
    assert_eq!(first.sample_indices(), second.sample_indices());

    // the layout does not depend on the seed
    for seed in 0..10 {
        let resampled = SmoteEnn::params().seed(seed).fit_resample(&dataset).unwrap();
        assert_eq!(resampled.nsamples(), 15);
        assert_eq!(
            &resampled.sample_indices()[12..],
            &[Some(5), Some(6), Some(18)]
        );
    }
}

#[test]
fn sample_with_other_features() {
    let dataset = binary();
    let model = SmoteEnn::params().seed(0).fit(&dataset).unwrap();

    let records = Array2::from_elem((100, 40), 0.5);
    let targets = Array1::from_shape_fn(100, |i| (i >= 50) as usize);
    let res = model.sample(&Dataset::new(records, targets));

    assert!(matches!(
        res,
        Err(ImbalanceError::FeatureMismatch {
            expected: 2,
            found: 40
        })
    ));
}

#[test]
fn bad_ratios() {
    let dataset = binary();

    for ratio in vec![-1.0, 100.0] {
        let res = SmoteEnn::params().sampling_strategy(ratio).fit(&dataset);
        assert!(matches!(res, Err(ImbalanceError::InvalidRatio(_))));
    }

    let res = "rnd".parse::<SamplingStrategy<usize>>();
    assert!(matches!(res, Err(ImbalanceError::UnknownStrategy(_))));

    let mut targets = BTreeMap::new();
    targets.insert(5usize, 10);
    let res = SmoteEnn::params().sampling_strategy(targets).fit(&dataset);
    assert!(matches!(res, Err(ImbalanceError::UnknownClass(_))));
}

#[test]
fn single_class() {
    let dataset = binary();
    let dataset = Dataset::new(dataset.records().clone(), Array1::<usize>::zeros(20));

    let model = SmoteEnn::params().fit(&dataset).unwrap();
    assert_eq!(model.target_type(), TargetType::SingleClass);

    let resampled = model.sample(&dataset).unwrap();
    assert_eq!(resampled.original_indices(), Some((0..20).collect()));
}

#[test]
fn multiclass() {
    let dataset = binary();
    let targets = Array1::from_shape_fn(20, |i| match i {
        0..=2 => 0usize,
        3..=4 => 1,
        _ => 2,
    });
    let dataset = Dataset::new(dataset.records().clone(), targets);

    let model = SmoteEnn::params()
        .k_neighbors(1usize)
        .fit(&dataset)
        .unwrap();
    assert_eq!(model.target_type(), TargetType::Multiclass);
    assert_eq!(model.minority(), &1);
    assert_eq!(model.majority(), &2);
}
