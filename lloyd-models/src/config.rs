#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use lloyd_core::{Dataset, LloydError, Result, Tolerance};

use crate::algorithm::Algorithm;
use crate::outcome::RunOutcome;

/// Settings for one k-means run.
///
/// Centroids come from `seeds` when present; otherwise `k` points are
/// sampled at random, reproducibly when `rng_seed` is set.
///
/// # Fields
///
/// - `k`: number of clusters
/// - `max_steps`: step budget handed to [`Algorithm::run`]
/// - `tolerance`: per-cluster convergence tolerance
/// - `seeds`: dataset indices of the initial centroids
/// - `rng_seed`: seed for the random source when `seeds` is `None`
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansConfig {
    pub k: usize,
    pub max_steps: usize,
    pub tolerance: Tolerance,
    pub seeds: Option<Vec<usize>>,
    pub rng_seed: Option<u64>,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            k: 2,
            max_steps: 300,
            tolerance: Tolerance::default(),
            seeds: None,
            rng_seed: None,
        }
    }
}

impl KMeansConfig {
    pub fn new(k: usize, max_steps: usize) -> Self {
        Self {
            k,
            max_steps,
            ..Self::default()
        }
    }

    pub fn with_seeds(mut self, seeds: Vec<usize>) -> Self {
        self.seeds = Some(seeds);
        self
    }

    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Checks the settings that do not depend on a dataset.
    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(LloydError::invalid_argument("k must be positive"));
        }

        if let Some(seeds) = &self.seeds {
            if seeds.len() != self.k {
                return Err(LloydError::invalid_argument(format!(
                    "expected {} seed indices, got {}",
                    self.k,
                    seeds.len()
                )));
            }
        }

        self.tolerance.validate()
    }

    /// Builds an [`Algorithm`] over `dataset` and runs it to convergence or
    /// until `max_steps` rounds have passed.
    ///
    /// # Errors
    ///
    /// - [`LloydError::InvalidArgument`] for any setting rejected by
    ///   [`validate`](KMeansConfig::validate) or by [`Algorithm`] construction
    pub fn fit<'a>(&self, dataset: &'a Dataset) -> Result<(Algorithm<'a>, RunOutcome)> {
        self.validate()?;

        let algorithm = match &self.seeds {
            Some(seeds) => Algorithm::with_seeds(dataset, self.k, seeds)?,
            None => self.random_start(dataset)?,
        };

        let mut algorithm = algorithm.with_tolerance(self.tolerance);
        let outcome = algorithm.run(self.max_steps);

        Ok((algorithm, outcome))
    }

    #[cfg(feature = "rng")]
    fn random_start<'a>(&self, dataset: &'a Dataset) -> Result<Algorithm<'a>> {
        use rand::SeedableRng;
        use rand_xoshiro::Xoshiro256PlusPlus;

        match self.rng_seed {
            Some(seed) => {
                let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
                Algorithm::with_rng(dataset, self.k, &mut rng)
            }
            None => Algorithm::new(dataset, self.k),
        }
    }

    #[cfg(not(feature = "rng"))]
    fn random_start<'a>(&self, _dataset: &'a Dataset) -> Result<Algorithm<'a>> {
        Err(LloydError::invalid_argument(
            "random initialization requires the `rng` feature; supply seeds instead",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use lloyd_core::Float;

    fn line() -> Dataset {
        let rows: Vec<Vec<Float>> = [0.0, 1.0, 2.0, 20.0, 21.0, 22.0]
            .iter()
            .map(|&v| vec![v])
            .collect();
        Dataset::with_points(1, &rows).unwrap()
    }

    #[test]
    fn test_config_default() {
        let config = KMeansConfig::default();
        assert_eq!(config.k, 2);
        assert_eq!(config.max_steps, 300);
        assert_eq!(config.tolerance, Tolerance::default());
        assert!(config.seeds.is_none());
        assert!(config.rng_seed.is_none());
    }

    #[test]
    fn test_config_validate_k_zero() {
        let config = KMeansConfig::new(0, 10);
        assert!(matches!(
            config.validate(),
            Err(LloydError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_config_validate_seed_count() {
        let config = KMeansConfig::new(2, 10).with_seeds(vec![0]);
        assert!(matches!(
            config.validate(),
            Err(LloydError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_config_validate_tolerance() {
        let config = KMeansConfig::new(2, 10).with_tolerance(Tolerance {
            relative: -1.0,
            absolute: 0.0,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_fit_with_seeds() {
        let ds = line();
        let (algo, outcome) = KMeansConfig::new(2, 100)
            .with_seeds(vec![0, 3])
            .fit(&ds)
            .unwrap();

        assert_eq!(outcome, RunOutcome::Converged { steps: 2 });
        assert_eq!(algo.clusters()[0].member_indices(), &[0, 1, 2]);
        assert_relative_eq!(algo.clusters()[1].centroid()[0], 21.0);
    }

    #[test]
    fn test_config_fit_k_too_large() {
        let ds = line();
        let result = KMeansConfig::new(7, 10).with_seeds(vec![0, 1, 2, 3, 4, 5, 5]).fit(&ds);
        assert!(matches!(result, Err(LloydError::InvalidArgument { .. })));
    }

    #[test]
    fn test_config_fit_zero_steps() {
        let ds = line();
        let (_, outcome) = KMeansConfig::new(2, 0)
            .with_seeds(vec![0, 3])
            .fit(&ds)
            .unwrap();
        assert_eq!(outcome, RunOutcome::Exhausted { steps: 0 });
    }

    #[test]
    #[cfg(feature = "rng")]
    fn test_config_fit_rng_seed_is_reproducible() {
        let ds = line();
        let config = KMeansConfig::new(2, 100).with_rng_seed(99);

        let (a, _) = config.fit(&ds).unwrap();
        let (b, _) = config.fit(&ds).unwrap();

        for (ca, cb) in a.clusters().iter().zip(b.clusters()) {
            assert_eq!(ca.centroid(), cb.centroid());
            assert_eq!(ca.member_indices(), cb.member_indices());
        }
    }

    #[test]
    #[cfg(feature = "serde")]
    fn test_config_from_json() {
        let config: KMeansConfig =
            serde_json::from_str(r#"{ "k": 3, "seeds": [0, 2, 4], "tolerance": { "absolute": 0.01 } }"#)
                .unwrap();

        assert_eq!(config.k, 3);
        assert_eq!(config.max_steps, 300);
        assert_eq!(config.seeds, Some(vec![0, 2, 4]));
        assert_eq!(config.tolerance.absolute, 0.01);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[cfg(feature = "serde")]
    fn test_config_serialize_roundtrip_preserves_state() {
        let config = KMeansConfig::new(4, 25).with_rng_seed(7);
        let serialized = serde_json::to_string(&config).unwrap();
        let deserialized: KMeansConfig = serde_json::from_str(&serialized).unwrap();
        assert_eq!(config, deserialized);
    }
}
