use std::fmt;

use lloyd_core::{Dataset, Float, LloydError, Point, Result, Tolerance};

/// A subset of a [`Dataset`] together with the centroid that represents it.
///
/// Membership is a set of dataset indices, not copies of points: the cluster
/// resolves indices through a shared, read-only borrow of the dataset. The
/// centroid is an owned point that usually lies *between* data points.
///
/// # Invariants
///
/// - `centroid().len() == dataset.dimension()`
/// - every member index is `< dataset.size()` and appears once
///
/// Member indices are kept in ascending order.
#[derive(Debug, Clone)]
pub struct Cluster<'a> {
    dataset: &'a Dataset,
    centroid: Point,
    indices: Vec<usize>,
    tolerance: Tolerance,
}

impl<'a> Cluster<'a> {
    /// Creates an empty cluster whose centroid is a copy of `seed`.
    ///
    /// # Errors
    ///
    /// - [`LloydError::InvalidArgument`] if `seed.len() != dataset.dimension()`
    ///   or `seed` has a non-finite coordinate
    pub fn new(dataset: &'a Dataset, seed: &[Float]) -> Result<Self> {
        if seed.len() != dataset.dimension() {
            return Err(LloydError::invalid_argument(format!(
                "centroid seed has dimension {}, dataset has {}",
                seed.len(),
                dataset.dimension()
            )));
        }

        if seed.iter().any(|v| !v.is_finite()) {
            return Err(LloydError::invalid_argument(
                "centroid seed must contain only finite numbers",
            ));
        }

        Ok(Self {
            dataset,
            centroid: Point::from_column_slice(seed),
            indices: Vec::new(),
            tolerance: Tolerance::default(),
        })
    }

    /// Replaces the tolerance used by [`recompute_centroid`](Cluster::recompute_centroid).
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Current centroid. Borrowed, so callers cannot move it.
    pub fn centroid(&self) -> &Point {
        &self.centroid
    }

    /// Member indices in ascending order.
    pub fn member_indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.binary_search(&index).is_ok()
    }

    /// Adds dataset `index` to this cluster. Adding a present index is a no-op.
    ///
    /// Appending in ascending order (as partitioning does) is `O(log m)`.
    ///
    /// # Errors
    ///
    /// - [`LloydError::IndexOutOfRange`] if `index >= dataset.size()`
    pub fn add_member(&mut self, index: usize) -> Result<()> {
        let size = self.dataset.size();
        if index >= size {
            return Err(LloydError::IndexOutOfRange { index, size });
        }

        if let Err(pos) = self.indices.binary_search(&index) {
            self.indices.insert(pos, index);
        }

        Ok(())
    }

    /// Appends `index` without checks, for callers that add members in
    /// strictly ascending order and within the dataset.
    pub(crate) fn push_member(&mut self, index: usize) {
        debug_assert!(index < self.dataset.size());
        debug_assert!(self.indices.last().map_or(true, |&last| last < index));
        self.indices.push(index);
    }

    /// Removes every member. The centroid is left as is.
    pub fn clear(&mut self) {
        self.indices.clear();
    }

    /// Copies of the member points, in index order.
    pub fn member_points(&self) -> Vec<Point> {
        let contents = self.dataset.contents();
        self.indices.iter().map(|&i| contents[i].clone()).collect()
    }

    /// Euclidean distance from `point` to the centroid.
    ///
    /// # Errors
    ///
    /// - [`LloydError::InvalidArgument`] if `point.len()` differs from the centroid's
    pub fn distance_to(&self, point: &[Float]) -> Result<Float> {
        if point.len() != self.centroid.len() {
            return Err(LloydError::invalid_argument(format!(
                "point has dimension {}, centroid has {}",
                point.len(),
                self.centroid.len()
            )));
        }

        Ok(self.distance_unchecked(point))
    }

    pub(crate) fn distance_unchecked(&self, point: &[Float]) -> Float {
        let dist = scaled_norm(self.centroid.iter().zip(point).map(|(c, p)| c - p));
        if dist.is_infinite() {
            // a coordinate difference past Float::MAX: measure at half size
            return 2.0 * scaled_norm(self.centroid.iter().zip(point).map(|(c, p)| c / 2.0 - p / 2.0));
        }
        dist
    }

    /// Largest distance from the centroid to any member, `0.0` when empty.
    ///
    /// Recomputed on every call.
    pub fn radius(&self) -> Float {
        let contents = self.dataset.contents();
        self.indices
            .iter()
            .map(|&i| self.distance_unchecked(contents[i].as_slice()))
            .fold(0.0, Float::max)
    }

    /// Moves the centroid to the coordinate-wise mean of the members.
    ///
    /// # Returns
    ///
    /// `true` if every coordinate of the new centroid is within
    /// [`tolerance`](Cluster::tolerance) of the old one, i.e. this cluster
    /// was already stable. An empty cluster keeps its centroid and reports
    /// `true`.
    pub fn recompute_centroid(&mut self) -> bool {
        if self.indices.is_empty() {
            return true;
        }

        // each member is divided before summing, so the mean stays finite
        // whenever the members are
        let contents = self.dataset.contents();
        let n = self.indices.len() as Float;
        let mut mean = Point::zeros(self.dataset.dimension());
        for &i in &self.indices {
            for (m, v) in mean.iter_mut().zip(contents[i].iter()) {
                *m += v / n;
            }
        }

        let unchanged = self
            .tolerance
            .all_close(self.centroid.as_slice(), mean.as_slice());
        self.centroid = mean;

        unchanged
    }
}

/// Euclidean norm of `diffs`, scaled by the largest magnitude so squaring
/// cannot overflow.
fn scaled_norm(diffs: impl Iterator<Item = Float> + Clone) -> Float {
    let scale = diffs.clone().map(Float::abs).fold(0.0, Float::max);
    if scale == 0.0 || scale.is_infinite() {
        return scale;
    }

    scale
        * diffs
            .map(|d| {
                let r = d / scale;
                r * r
            })
            .sum::<Float>()
            .sqrt()
}

impl fmt::Display for Cluster<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (j, v) in self.centroid.iter().enumerate() {
            if j > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}", v)?;
        }
        write!(f, "]")
    }
}
