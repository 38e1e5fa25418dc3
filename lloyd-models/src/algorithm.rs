use std::collections::HashSet;

use lloyd_core::{Dataset, Float, LloydError, Result, Tolerance};
use tracing::{debug, info, warn};

use crate::cluster::Cluster;
use crate::outcome::RunOutcome;

/// **K-Means clustering** (Lloyd's algorithm) over a borrowed [`Dataset`].
///
/// Each round has two halves:
/// 1. **Partition**: every point joins the cluster with the nearest centroid
/// 2. **Update**: every cluster moves its centroid to the mean of its members
///
/// The run has converged once an update leaves every centroid in place
/// (within each cluster's [`Tolerance`]).
///
/// # Distance metric
///
/// Plain **Euclidean distance**. Ties go to the cluster that comes first in
/// [`clusters`](Algorithm::clusters).
///
/// # Initialization
///
/// Either caller-supplied seed indices ([`with_seeds`](Algorithm::with_seeds))
/// or `k` distinct points sampled uniformly without replacement
/// ([`with_rng`](Algorithm::with_rng), [`new`](Algorithm::new)).
///
/// # Errors
///
/// - [`LloydError::InvalidArgument`] if `k == 0`, `k > dataset.size()`, or the
///   seed list has the wrong length, duplicates, or out-of-range entries
///
/// # Notes
///
/// - The dataset is borrowed immutably for the whole run, so it cannot change
///   between rounds.
/// - Clusters may end a round empty; an empty cluster keeps its centroid.
#[derive(Debug, Clone)]
pub struct Algorithm<'a> {
    dataset: &'a Dataset,
    clusters: Vec<Cluster<'a>>,
}

impl<'a> Algorithm<'a> {
    /// Seeds `k` clusters from distinct random points, using the thread-local RNG.
    #[cfg(feature = "rng")]
    pub fn new(dataset: &'a Dataset, k: usize) -> Result<Self> {
        Self::with_rng(dataset, k, &mut rand::rng())
    }

    /// Seeds `k` clusters from distinct points sampled uniformly without
    /// replacement from `rng`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lloyd_core::Dataset;
    /// use lloyd_models::Algorithm;
    /// use rand::SeedableRng;
    /// use rand_xoshiro::Xoshiro256PlusPlus;
    ///
    /// let ds = Dataset::with_points(1, &[vec![0.0], vec![1.0], vec![9.0]]).unwrap();
    /// let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
    /// let algo = Algorithm::with_rng(&ds, 2, &mut rng).unwrap();
    /// assert_eq!(algo.k(), 2);
    /// ```
    #[cfg(feature = "rng")]
    pub fn with_rng<R: rand::Rng + ?Sized>(
        dataset: &'a Dataset,
        k: usize,
        rng: &mut R,
    ) -> Result<Self> {
        check_k(dataset, k)?;

        let seeds = rand::seq::index::sample(rng, dataset.size(), k).into_vec();
        debug!(k, ?seeds, "sampled initial centroids");

        Self::from_seeds(dataset, &seeds)
    }

    /// Seeds cluster `i` from the point at `seeds[i]`.
    ///
    /// `seeds` must hold exactly `k` distinct indices into `dataset`.
    pub fn with_seeds(dataset: &'a Dataset, k: usize, seeds: &[usize]) -> Result<Self> {
        check_k(dataset, k)?;

        if seeds.len() != k {
            return Err(LloydError::invalid_argument(format!(
                "expected {} seed indices, got {}",
                k,
                seeds.len()
            )));
        }

        let size = dataset.size();
        let mut seen = HashSet::with_capacity(k);
        for &index in seeds {
            if index >= size {
                return Err(LloydError::invalid_argument(format!(
                    "seed index {} out of range for dataset of size {}",
                    index, size
                )));
            }
            if !seen.insert(index) {
                return Err(LloydError::invalid_argument(format!(
                    "duplicate seed index {}",
                    index
                )));
            }
        }

        Self::from_seeds(dataset, seeds)
    }

    fn from_seeds(dataset: &'a Dataset, seeds: &[usize]) -> Result<Self> {
        let contents = dataset.contents();
        let clusters = seeds
            .iter()
            .map(|&i| Cluster::new(dataset, contents[i].as_slice()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { dataset, clusters })
    }

    /// Applies `tolerance` to every cluster's convergence check.
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.clusters = self
            .clusters
            .into_iter()
            .map(|c| c.with_tolerance(tolerance))
            .collect();
        self
    }

    /// Number of clusters. Fixed at construction.
    pub fn k(&self) -> usize {
        self.clusters.len()
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn clusters(&self) -> &[Cluster<'a>] {
        &self.clusters
    }

    /// Mutable view of the clusters.
    ///
    /// Changes made here (clearing, adding members) are seen by the next
    /// [`update`](Algorithm::update); keeping memberships consistent is then
    /// up to the caller. The slice cannot grow or shrink, so `k` is fixed.
    pub fn clusters_mut(&mut self) -> &mut [Cluster<'a>] {
        &mut self.clusters
    }

    /// Index into [`clusters`](Algorithm::clusters) of the cluster whose
    /// centroid is nearest to `point`. The lowest index wins a tie.
    ///
    /// # Errors
    ///
    /// - [`LloydError::InvalidArgument`] if `point.len() != dataset.dimension()`
    pub fn nearest_cluster(&self, point: &[Float]) -> Result<usize> {
        let d = self.dataset.dimension();
        if point.len() != d {
            return Err(LloydError::invalid_argument(format!(
                "point has dimension {}, dataset has {}",
                point.len(),
                d
            )));
        }

        Ok(self.nearest_unchecked(point))
    }

    fn nearest_unchecked(&self, point: &[Float]) -> usize {
        let mut min_dist = Float::INFINITY;
        let mut best_cluster = 0;

        for (c, cluster) in self.clusters.iter().enumerate() {
            let dist = cluster.distance_unchecked(point);
            // strict: an equal distance never displaces an earlier cluster
            if dist < min_dist {
                min_dist = dist;
                best_cluster = c;
            }
        }

        best_cluster
    }

    /// Clears every cluster, then assigns each dataset index, in ascending
    /// order, to its nearest cluster.
    ///
    /// Afterwards every index belongs to exactly one cluster.
    pub fn partition(&mut self) {
        for cluster in &mut self.clusters {
            cluster.clear();
        }

        let dataset = self.dataset;
        for (i, point) in dataset.iter().enumerate() {
            let best = self.nearest_unchecked(point.as_slice());
            // indices arrive ascending and in range, into freshly cleared clusters
            self.clusters[best].push_member(i);
        }

        for (c, cluster) in self.clusters.iter().enumerate() {
            if cluster.is_empty() {
                warn!(cluster = c, "cluster is empty after partition");
            }
        }

        debug!(
            sizes = ?self.clusters.iter().map(Cluster::len).collect::<Vec<_>>(),
            "partitioned dataset"
        );
    }

    /// Recomputes every centroid and returns `true` only if none moved.
    ///
    /// Every cluster is recomputed even after one reports a change.
    pub fn update(&mut self) -> bool {
        let mut unchanged = true;
        for cluster in &mut self.clusters {
            if !cluster.recompute_centroid() {
                unchanged = false;
            }
        }

        debug!(unchanged, "updated centroids");
        unchanged
    }

    /// One round: [`partition`](Algorithm::partition) then
    /// [`update`](Algorithm::update). Returns `true` on convergence.
    pub fn step(&mut self) -> bool {
        self.partition();
        self.update()
    }

    /// Runs up to `max_steps` rounds, stopping after the first round that
    /// converges. `run(0)` does nothing and reports
    /// [`RunOutcome::Exhausted`].
    ///
    /// # Complexity
    ///
    /// Let `n = dataset.size()`, `d = dimension`, `t = rounds run`.
    /// - Time: `O(t * k * n * d)`
    /// - Space: `O(k * d + n)`
    pub fn run(&mut self, max_steps: usize) -> RunOutcome {
        for steps in 1..=max_steps {
            if self.step() {
                info!(steps, k = self.k(), "k-means converged");
                return RunOutcome::Converged { steps };
            }
        }

        info!(steps = max_steps, k = self.k(), "k-means step budget exhausted");
        RunOutcome::Exhausted { steps: max_steps }
    }

    /// Cluster label of each dataset index, derived from the memberships.
    ///
    /// `None` until every index belongs to exactly one cluster, which holds
    /// after any [`partition`](Algorithm::partition) unless the caller edits
    /// memberships through [`clusters_mut`](Algorithm::clusters_mut).
    pub fn assignments(&self) -> Option<Vec<usize>> {
        let mut labels = vec![None; self.dataset.size()];

        for (c, cluster) in self.clusters.iter().enumerate() {
            for &i in cluster.member_indices() {
                if labels[i].replace(c).is_some() {
                    return None;
                }
            }
        }

        labels.into_iter().collect()
    }
}

fn check_k(dataset: &Dataset, k: usize) -> Result<()> {
    let n = dataset.size();
    if k == 0 || k > n {
        return Err(LloydError::invalid_argument(format!(
            "k = {} must be in 1..={} (dataset size)",
            k, n
        )));
    }
    Ok(())
}
