/// Scalar type for every coordinate, centroid and distance.
pub type Float = f64;

/// A single point (or centroid) in `d`-dimensional space.
pub type Point = nalgebra::DVector<Float>;

/// Row-major view of a point table: one row per point, one column per dimension.
pub type Matrix = nalgebra::DMatrix<Float>;
