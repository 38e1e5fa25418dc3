use crate::{Float, LloydError, Matrix, Point, Result};

/// An append-only table of `d`-dimensional points.
///
/// The dimension is fixed at construction. Points are stored in append
/// order, and a point's position is its index for the lifetime of the
/// dataset: there is no removal or reordering.
///
/// # Access
///
/// - [`point_at`](Dataset::point_at) returns an owned copy.
/// - [`contents`](Dataset::contents) returns a borrowed, read-only view of
///   the backing storage for bulk reads.
///
/// The only mutation path is [`append`](Dataset::append), which needs
/// `&mut self`, so a dataset borrowed by a running clustering cannot change
/// underneath it.
///
/// # Errors
///
/// - [`LloydError::InvalidArgument`] for a zero dimension, ragged rows,
///   non-finite coordinates, or a point of the wrong length
/// - [`LloydError::IndexOutOfRange`] on lookup past the end
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    dimension: usize,
    points: Vec<Point>,
}

impl Dataset {
    /// Creates an empty dataset for points of length `dimension`.
    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(LloydError::invalid_argument("dimension must be positive"));
        }

        Ok(Self {
            dimension,
            points: Vec::new(),
        })
    }

    /// Creates a dataset seeded with a copy of `rows`, in order.
    ///
    /// `rows` must be non-empty and rectangular with row length `dimension`.
    /// Nothing is stored unless every row passes validation.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lloyd_core::Dataset;
    ///
    /// let ds = Dataset::with_points(2, &[vec![0.0, 1.0], vec![2.0, 3.0]]).unwrap();
    /// assert_eq!(ds.size(), 2);
    /// ```
    pub fn with_points<R: AsRef<[Float]>>(dimension: usize, rows: &[R]) -> Result<Self> {
        let mut dataset = Self::new(dimension)?;

        if rows.is_empty() {
            return Err(LloydError::invalid_argument(
                "initial points must be a non-empty table",
            ));
        }

        for (i, row) in rows.iter().enumerate() {
            dataset
                .check_point(row.as_ref())
                .map_err(|err| match err {
                    LloydError::InvalidArgument { message } => {
                        LloydError::invalid_argument(format!("row {}: {}", i, message))
                    }
                    other => other,
                })?;
        }

        dataset.points = rows
            .iter()
            .map(|row| Point::from_column_slice(row.as_ref()))
            .collect();

        Ok(dataset)
    }

    /// Creates a dataset from a matrix, one row per point.
    pub fn from_matrix(x: &Matrix) -> Result<Self> {
        let rows: Vec<Vec<Float>> = x
            .row_iter()
            .map(|row| row.iter().copied().collect())
            .collect();

        Self::with_points(x.ncols(), &rows)
    }

    /// Number of points currently stored.
    pub fn size(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns a copy of the point at `index`.
    pub fn point_at(&self, index: usize) -> Result<Point> {
        self.points
            .get(index)
            .cloned()
            .ok_or(LloydError::IndexOutOfRange {
                index,
                size: self.size(),
            })
    }

    /// Read-only view of the backing storage, indexed like the dataset.
    pub fn contents(&self) -> &[Point] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }

    /// Appends a copy of `point`, which receives index `size()`.
    pub fn append(&mut self, point: &[Float]) -> Result<usize> {
        self.check_point(point)?;

        self.points.push(Point::from_column_slice(point));
        Ok(self.points.len() - 1)
    }

    fn check_point(&self, point: &[Float]) -> Result<()> {
        if point.len() != self.dimension {
            return Err(LloydError::invalid_argument(format!(
                "expected a point of dimension {}, got {}",
                self.dimension,
                point.len()
            )));
        }

        if let Some(j) = point.iter().position(|v| !v.is_finite()) {
            return Err(LloydError::invalid_argument(format!(
                "coordinate {} is not a finite number ({})",
                j, point[j]
            )));
        }

        Ok(())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
