mod helpers;

use approx::assert_relative_eq;
use lloyd::{Algorithm, Cluster, Dataset, Float, KMeansConfig, LloydError, RunOutcome};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use helpers::{covered_indices, dataset};

#[test]
fn test_two_pairs_converge_in_one_step() {
    let ds = dataset(1, &[&[0.0], &[0.0], &[10.0], &[10.0]]);
    let mut algo = Algorithm::with_seeds(&ds, 2, &[0, 2]).unwrap();

    assert!(algo.step());

    let clusters = algo.clusters();
    assert_eq!(clusters[0].member_indices(), &[0, 1]);
    assert_eq!(clusters[0].centroid().as_slice(), &[0.0]);
    assert_eq!(clusters[1].member_indices(), &[2, 3]);
    assert_eq!(clusters[1].centroid().as_slice(), &[10.0]);

    // memberships are unchanged, so a bare update is stable too
    assert!(algo.update());
}

#[test]
fn test_k_equals_size_gives_singletons() {
    let ds = dataset(2, &[&[1.0, 1.0], &[4.0, -2.0], &[0.5, 9.0], &[-3.0, -3.0]]);
    let mut algo = Algorithm::with_seeds(&ds, 4, &[0, 1, 2, 3]).unwrap();

    algo.partition();
    for (i, cluster) in algo.clusters().iter().enumerate() {
        assert_eq!(cluster.member_indices(), &[i]);
        assert_eq!(cluster.distance_to(ds.contents()[i].as_slice()).unwrap(), 0.0);
    }

    assert!(algo.update());
    assert_eq!(algo.run(5), RunOutcome::Converged { steps: 1 });
}

#[test]
fn test_run_zero_is_exhausted() {
    let ds = dataset(1, &[&[0.0], &[1.0]]);
    let mut algo = Algorithm::with_seeds(&ds, 2, &[0, 1]).unwrap();

    let outcome = algo.run(0);
    assert_eq!(outcome, RunOutcome::Exhausted { steps: 0 });
    assert_eq!(outcome.to_string(), "done after the maximum number of steps to try");
    assert!(algo.clusters().iter().all(Cluster::is_empty));
}

#[test]
fn test_run_counts_single_steps() {
    // 1-D chain where the right centroid walks left over several rounds
    let ds = dataset(1, &[&[0.0], &[1.0], &[2.0], &[3.0], &[100.0]]);
    let mut algo = Algorithm::with_seeds(&ds, 2, &[0, 1]).unwrap();
    let outcome = algo.run(100);

    assert!(outcome.is_converged());
    // every round but the last moved a centroid, so no round was skipped
    let mut replay = Algorithm::with_seeds(&ds, 2, &[0, 1]).unwrap();
    for _ in 1..outcome.steps() {
        assert!(!replay.step());
    }
    assert!(replay.step());

    assert_eq!(algo.clusters()[0].member_indices(), &[0, 1, 2, 3]);
    assert_eq!(algo.clusters()[1].member_indices(), &[4]);
    assert_relative_eq!(algo.clusters()[0].centroid()[0], 1.5);
}

#[test]
#[cfg(feature = "rng")]
fn test_partition_covers_random_dataset() {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(2024);
    let rows: Vec<Vec<Float>> = (0..200)
        .map(|_| (0..3).map(|_| rng.random_range(-50.0..50.0)).collect())
        .collect();
    let ds = Dataset::with_points(3, &rows).unwrap();

    let mut algo = Algorithm::with_rng(&ds, 7, &mut rng).unwrap();
    for _ in 0..5 {
        algo.partition();
        assert_eq!(covered_indices(&algo), (0..200).collect::<Vec<_>>());
        algo.update();
    }

    let labels = algo.assignments().unwrap();
    assert_eq!(labels.len(), 200);
    assert!(labels.iter().all(|&c| c < 7));
}

#[test]
fn test_radius_bounds_members_after_run() {
    let ds = dataset(
        2,
        &[
            &[0.0, 0.0],
            &[0.0, 1.0],
            &[1.0, 0.0],
            &[9.0, 9.0],
            &[9.0, 10.0],
            &[10.0, 9.0],
        ],
    );
    let mut algo = Algorithm::with_seeds(&ds, 2, &[0, 3]).unwrap();
    assert!(algo.run(20).is_converged());

    for cluster in algo.clusters() {
        let radius = cluster.radius();
        assert!(radius > 0.0);
        for p in cluster.member_points() {
            assert!(cluster.distance_to(p.as_slice()).unwrap() <= radius);
        }
    }
}

#[test]
fn test_dataset_growth_then_clustering() {
    let mut ds = Dataset::new(2).unwrap();
    for p in [[0.0, 0.0], [0.5, 0.0], [5.0, 5.0], [6.0, 5.0]] {
        let before = ds.size();
        ds.append(&p).unwrap();
        assert_eq!(ds.size(), before + 1);
        assert_eq!(ds.point_at(before).unwrap().as_slice(), &p);
    }

    let (algo, outcome) = KMeansConfig::new(2, 50)
        .with_seeds(vec![0, 2])
        .fit(&ds)
        .unwrap();
    assert!(outcome.is_converged());
    assert_eq!(algo.assignments().unwrap(), vec![0, 0, 1, 1]);
    assert_eq!(algo.clusters()[1].to_string(), "[5.5, 5.0]");
}

#[test]
fn test_invalid_construction_errors() {
    let ds = dataset(1, &[&[0.0], &[1.0], &[2.0]]);

    for (k, seeds) in [
        (0, vec![]),
        (4, vec![0, 1, 2, 2]),
        (2, vec![0, 1, 2]),
        (2, vec![1, 1]),
        (2, vec![0, 3]),
    ] {
        let result = Algorithm::with_seeds(&ds, k, &seeds);
        assert!(
            matches!(result, Err(LloydError::InvalidArgument { .. })),
            "k = {}, seeds = {:?}",
            k,
            seeds
        );
    }
}
