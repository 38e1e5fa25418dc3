use lloyd::{Algorithm, Dataset, Float};

pub fn dataset(dimension: usize, rows: &[&[Float]]) -> Dataset {
    Dataset::with_points(dimension, rows).unwrap()
}

/// Sorted union of every cluster's membership.
pub fn covered_indices(algo: &Algorithm) -> Vec<usize> {
    let mut all: Vec<usize> = algo
        .clusters()
        .iter()
        .flat_map(|c| c.member_indices().iter().copied())
        .collect();
    all.sort_unstable();
    all
}
