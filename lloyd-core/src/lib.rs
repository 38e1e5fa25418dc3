pub mod dataset;
pub mod error;
pub mod tolerance;
pub mod types;

pub use types::{Float, Matrix, Point};

pub use error::{LloydError, Result};

pub use dataset::Dataset;
pub use tolerance::Tolerance;
