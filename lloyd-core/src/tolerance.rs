#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Float, LloydError, Result};

/// Relative tolerance used when no other is configured.
pub const DEFAULT_RELATIVE: Float = 1e-5;

/// Absolute tolerance used when no other is configured.
pub const DEFAULT_ABSOLUTE: Float = 1e-8;

/// Named `(relative, absolute)` tolerance pair for deciding whether a
/// centroid coordinate "did not move".
///
/// Two values `old` and `new` are close when
///
/// ```text
/// |old - new| <= absolute + relative * |new|
/// ```
///
/// The test is asymmetric: `new` is the reference value the relative part
/// scales with. `NaN` is never close to anything.
///
/// # Examples
///
/// ```rust
/// use lloyd_core::Tolerance;
///
/// let tol = Tolerance::default();
/// assert!(tol.is_close(1.0, 1.0 + 1e-9));
/// assert!(!tol.is_close(1.0, 1.1));
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Scaled by the magnitude of the new value.
    pub relative: Float,
    /// Fixed slack, dominates near zero.
    pub absolute: Float,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            relative: DEFAULT_RELATIVE,
            absolute: DEFAULT_ABSOLUTE,
        }
    }
}

impl Tolerance {
    /// Creates a validated tolerance pair.
    ///
    /// # Errors
    ///
    /// - [`LloydError::InvalidArgument`] if either part is negative or not finite
    pub fn new(relative: Float, absolute: Float) -> Result<Self> {
        let tol = Self { relative, absolute };
        tol.validate()?;
        Ok(tol)
    }

    /// Zero slack: only bit-for-bit equal coordinates count as unchanged.
    pub fn exact() -> Self {
        Self {
            relative: 0.0,
            absolute: 0.0,
        }
    }

    pub fn with_relative(mut self, relative: Float) -> Self {
        self.relative = relative;
        self
    }

    pub fn with_absolute(mut self, absolute: Float) -> Self {
        self.absolute = absolute;
        self
    }

    /// Checks that both parts are finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("relative", self.relative), ("absolute", self.absolute)] {
            if !value.is_finite() || value < 0.0 {
                return Err(LloydError::invalid_argument(format!(
                    "{} tolerance must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    pub fn is_close(&self, old: Float, new: Float) -> bool {
        if old == new {
            return true;
        }
        // unequal values where either is infinite are never close
        if old.is_infinite() || new.is_infinite() {
            return false;
        }
        (old - new).abs() <= self.absolute + self.relative * new.abs()
    }

    /// Coordinate-wise [`is_close`](Tolerance::is_close).
    ///
    /// Slices of different lengths are never close.
    pub fn all_close(&self, old: &[Float], new: &[Float]) -> bool {
        old.len() == new.len() && old.iter().zip(new).all(|(&a, &b)| self.is_close(a, b))
    }
}
