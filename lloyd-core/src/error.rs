use thiserror::Error;

/// Precondition failures raised at the API boundary.
///
/// Every fallible operation validates its arguments before touching any
/// state, so an `Err` always leaves the receiver exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LloydError {
    /// Malformed dimension, ragged or non-finite point data, bad `k`,
    /// malformed seed list, or a point whose length does not match.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Index outside `0..size` on point lookup or membership addition.
    #[error("index {index} out of range for size {size}")]
    IndexOutOfRange { index: usize, size: usize },
}

impl LloydError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LloydError>;
