pub mod algorithm;
pub mod cluster;
pub mod config;
pub mod outcome;

pub use algorithm::Algorithm;
pub use cluster::Cluster;
pub use config::KMeansConfig;
pub use outcome::RunOutcome;
