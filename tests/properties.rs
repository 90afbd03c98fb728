use ndarray::Array2;
use proptest::prelude::*;

use optics_clustering::{
    extract_clusters, find_k_peaks, find_persistent_peaks, undefined_reachability, Fit, Optics,
};

fn dataset() -> impl Strategy<Value = Array2<f64>> {
    prop::collection::vec(prop::array::uniform2(-50.0..50.0_f64), 1..40).prop_map(|points| {
        let n = points.len();
        let flat: Vec<f64> = points.into_iter().flatten().collect();
        Array2::from_shape_vec((n, 2), flat).unwrap()
    })
}

fn dataset_and_borders() -> impl Strategy<Value = (Array2<f64>, Vec<usize>)> {
    dataset().prop_flat_map(|data| {
        let n = data.nrows();
        let borders = prop::collection::btree_set(0..=n, 0..4)
            .prop_map(|set| set.into_iter().collect::<Vec<_>>());
        (Just(data), borders)
    })
}

proptest! {
    // Every point is emitted exactly once, whatever the parameters.
    #[test]
    fn every_point_emitted_once(
        data in dataset(),
        eps in 0.0..30.0_f64,
        min_pts in 1_usize..6,
    ) {
        let ordering = Optics::new(eps, min_pts).fit(&data).unwrap();
        prop_assert_eq!(ordering.len(), data.nrows());
        let mut points = ordering.points().to_vec();
        points.sort_unstable();
        prop_assert_eq!(points, (0..data.nrows()).collect::<Vec<_>>());
    }

    // Identical inputs replay to identical orderings and reachabilities.
    #[test]
    fn replay_is_identical(
        data in dataset(),
        eps in 0.0..30.0_f64,
        min_pts in 1_usize..6,
    ) {
        let first = Optics::new(eps, min_pts).fit(&data).unwrap();
        let second = Optics::new(eps, min_pts).fit(&data).unwrap();
        prop_assert_eq!(first, second);
    }

    // The first emission of a run starts an expansion, so it always records
    // the undefined sentinel.
    #[test]
    fn first_emission_is_undefined(
        data in dataset(),
        eps in 0.0..30.0_f64,
        min_pts in 1_usize..6,
    ) {
        let ordering = Optics::new(eps, min_pts).fit(&data).unwrap();
        prop_assert_eq!(ordering.reachabilities()[0], undefined_reachability::<f64>());
    }

    // Peak indices stay inside the ordering and top-k returns at most k - 1.
    #[test]
    fn peaks_in_bounds_and_capped(
        data in dataset(),
        k in 1_usize..6,
        threshold in 0.0..10.0_f64,
    ) {
        let ordering = Optics::new(5.0, 2).fit(&data).unwrap();
        let signal = ordering.reachabilities();

        let top = find_k_peaks(signal, k).unwrap();
        prop_assert!(top.len() <= k - 1);
        prop_assert!(top.iter().all(|&i| i < ordering.len()));

        let persistent = find_persistent_peaks(signal, threshold).unwrap();
        prop_assert!(persistent.iter().all(|&i| i < ordering.len()));
    }

    // The buckets partition the point set, and their number depends on the
    // border count alone.
    #[test]
    fn buckets_partition_the_ordering(
        (data, borders) in dataset_and_borders(),
        threshold in -5.0..50.0_f64,
    ) {
        let ordering = Optics::new(5.0, 2).fit(&data).unwrap();
        let buckets = extract_clusters(&ordering, &borders, threshold).unwrap();
        prop_assert_eq!(buckets.len(), borders.len() + 2);

        let mut all: Vec<usize> = buckets.into_iter().flatten().collect();
        all.sort_unstable();
        prop_assert_eq!(all, (0..data.nrows()).collect::<Vec<_>>());
    }
}
