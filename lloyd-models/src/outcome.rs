use std::fmt;

/// How a bounded [`run`](crate::Algorithm::run) ended.
///
/// Running out of steps is a normal result, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// A round reported every centroid stable. `steps` counts that round.
    Converged { steps: usize },
    /// The step budget ran out first. `steps` equals the budget.
    Exhausted { steps: usize },
}

impl RunOutcome {
    pub fn is_converged(&self) -> bool {
        matches!(self, Self::Converged { .. })
    }

    /// Number of partition/update rounds performed.
    pub fn steps(&self) -> usize {
        match *self {
            Self::Converged { steps } | Self::Exhausted { steps } => steps,
        }
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Converged { .. } => write!(f, "done after the algorithm converged"),
            Self::Exhausted { .. } => write!(f, "done after the maximum number of steps to try"),
        }
    }
}
