use linfa::prelude::*;
use linfa_imbalance::under_sampling::{AllKnn, RepeatedEditedNearestNeighbours, Termination};
use linfa_imbalance::{FitResample, KNeighbours, SelectionKind};
use linfa_nn::CommonNearestNeighbour;
use ndarray::{array, Array1, Array2, Ix1};

fn three_classes() -> Dataset<f64, usize, Ix1> {
    let records = array![
        [-0.12840393, 0.66446571],
        [1.32319756, -0.13181616],
        [0.04296502, -0.37981873],
        [0.83631853, 0.18569783],
        [1.02956816, 0.36061601],
        [1.12202806, 0.33811558],
        [-0.53171468, -0.53735182],
        [1.3381556, 0.35956356],
        [-0.35946678, 0.72510189],
        [1.32326943, 0.28393874],
        [2.94290565, -0.13986434],
        [0.28294738, -1.00125525],
        [0.34218094, -0.58781961],
        [-0.88864036, -0.33782387],
        [-1.10146139, 0.91782682],
        [-0.7969716, -0.50493969],
        [0.73489726, 0.43915195],
        [0.2096964, -0.61814058],
        [-0.28479268, 0.70459548],
        [1.84864913, 0.14729596],
        [1.59068979, -0.96622933],
        [0.73418199, -0.02222847],
        [0.50307437, 0.498805],
        [0.84929742, 0.41042894],
        [0.62649535, 0.46600596],
        [0.79270821, -0.41386668],
        [1.16606871, -0.25641059],
        [1.57356906, 0.30390519],
        [1.0304995, -0.16955962],
        [1.67314371, 0.19231498],
        [0.98382284, 0.37184502],
        [0.48921682, -1.38504507],
        [-0.46226554, -0.50481004],
        [-0.03918551, -0.68540745],
        [0.24991051, -1.00864997],
        [0.80541964, -0.34465185],
        [0.1732627, -1.61323172],
        [0.69804044, 0.44810796],
        [-0.5506368, -0.42072426],
        [-0.34474418, 0.21969797]
    ];
    let targets = array![
        1usize, 2, 2, 2, 1, 1, 0, 2, 1, 1, 1, 2, 2, 0, 1, 2, 1, 2, 1, 1, 2, 2, 1, 1, 1, 2, 2, 2,
        2, 1, 1, 2, 0, 2, 2, 2, 2, 1, 2, 0
    ];

    Dataset::new(records, targets)
}

fn expected_targets(n_per_class: &[usize]) -> Array1<usize> {
    n_per_class
        .iter()
        .enumerate()
        .flat_map(|(label, &n)| std::iter::repeat(label).take(n))
        .collect()
}

#[test]
fn all_knn_fixture() {
    let dataset = three_classes();

    let resampled = AllKnn::params().fit_resample(&dataset).unwrap();

    let indices = vec![
        6, 13, 32, 39, 4, 5, 14, 16, 22, 23, 24, 30, 37, 2, 11, 12, 17, 20, 21, 25, 26, 28, 31,
        33, 34, 35, 36,
    ];
    assert_eq!(resampled.original_indices(), Some(indices.clone()));
    assert_eq!(resampled.targets(), &expected_targets(&[4, 9, 14]));
    assert_eq!(
        resampled.records(),
        &dataset.records().select(ndarray::Axis(0), &indices)
    );
}

#[test]
fn all_knn_mode_fixture() {
    let dataset = three_classes();
    let expected_indices = vec![
        6, 13, 32, 39, 0, 4, 5, 8, 14, 16, 18, 22, 23, 24, 30, 37, 1, 2, 11, 12, 17, 20, 21, 25,
        26, 28, 31, 33, 34, 35, 36,
    ];

    for nn_algo in vec![
        CommonNearestNeighbour::KdTree,
        CommonNearestNeighbour::BallTree,
        CommonNearestNeighbour::LinearSearch,
    ] {
        let resampled = AllKnn::params()
            .n_neighbors(KNeighbours::new(3).with_algo(nn_algo))
            .kind_sel(SelectionKind::Mode)
            .fit_resample(&dataset)
            .unwrap();

        assert_eq!(resampled.original_indices(), Some(expected_indices.clone()));
        assert_eq!(resampled.targets(), &expected_targets(&[4, 12, 15]));
    }
}

#[test]
fn all_knn_reports_passes() {
    let dataset = three_classes();

    let outcome = AllKnn::params().clean(&dataset).unwrap();
    assert_eq!(outcome.n_passes(), 3);
    assert_eq!(outcome.termination(), Termination::Exhausted);
    assert_eq!(outcome.resampled().nsamples(), 27);

    // the pass with two neighbours removes nothing but the schedule goes on
    let outcome = AllKnn::params()
        .kind_sel(SelectionKind::Mode)
        .clean(&dataset)
        .unwrap();
    assert_eq!(outcome.n_passes(), 2);
    assert_eq!(outcome.termination(), Termination::Exhausted);
    assert_eq!(outcome.resampled().nsamples(), 31);
}

#[test]
fn repeated_enn_reaches_fixed_point() {
    let dataset = three_classes();

    let outcome = RepeatedEditedNearestNeighbours::params()
        .clean(&dataset)
        .unwrap();
    assert_eq!(outcome.termination(), Termination::Converged);
    assert_eq!(outcome.n_passes(), 2);
    assert_eq!(
        outcome.resampled().original_indices(),
        Some(vec![
            6, 13, 32, 39, 4, 5, 16, 22, 23, 24, 30, 37, 2, 11, 12, 17, 20, 21, 25, 26, 28, 31,
            33, 34, 35, 36
        ])
    );

    // one more pass over the cleaned data removes nothing
    let cleaned = outcome.into_resampled().into_dataset();
    let again = RepeatedEditedNearestNeighbours::params()
        .max_iter(1)
        .fit_resample(&cleaned)
        .unwrap();
    assert_eq!(again.nsamples(), cleaned.nsamples());
}

#[test]
fn allow_minority_keeps_at_least_as_many() {
    let dataset = three_classes();

    let protected = AllKnn::params().allow_minority(true).fit_resample(&dataset).unwrap();
    let unprotected = AllKnn::params().fit_resample(&dataset).unwrap();
    assert!(protected.nsamples() >= unprotected.nsamples());
    // no class falls below the four samples of class 0 on this data
    assert_eq!(protected.sample_indices(), unprotected.sample_indices());
}

#[test]
fn zero_neighbours_is_rejected() {
    let dataset = three_classes();

    assert!(AllKnn::params().n_neighbors(0usize).fit_resample(&dataset).is_err());

    let records = Array2::<f64>::zeros((0, 2));
    let empty = Dataset::new(records, Array1::<usize>::zeros(0));
    assert!(AllKnn::params().fit_resample(&empty).is_err());
}
