//! In-memory k-means clustering.
//!
//! A [`Dataset`] holds the points, an [`Algorithm`] borrows it and drives
//! partition/update rounds over a fixed set of [`Cluster`]s.
//!
//! ```rust
//! use lloyd::{Algorithm, Dataset, RunOutcome};
//!
//! let ds = Dataset::with_points(1, &[vec![0.0], vec![0.0], vec![10.0], vec![10.0]]).unwrap();
//! let mut algo = Algorithm::with_seeds(&ds, 2, &[0, 2]).unwrap();
//!
//! assert_eq!(algo.run(10), RunOutcome::Converged { steps: 1 });
//! assert_eq!(algo.clusters()[1].member_indices(), &[2, 3]);
//! ```

pub use lloyd_core::{dataset, error, tolerance, types};
pub use lloyd_core::{Dataset, Float, LloydError, Matrix, Point, Result, Tolerance};

pub use lloyd_models::{algorithm, cluster, config, outcome};
pub use lloyd_models::{Algorithm, Cluster, KMeansConfig, RunOutcome};
