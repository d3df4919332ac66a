//! Error types for solver operations.

use roche_core::error::CoreError;
use thiserror::Error;

/// Errors that can occur while solving for radii or the saddle point.
///
/// A radius that fails to converge is not an error; it is reported as
/// [`crate::RadiusResult::NotConverged`] so that batches never abort.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Invalid input: {what}")]
    InvalidInput { what: String },

    #[error("Invalid direction at index {index}: {what}")]
    InvalidDirection { index: usize, what: String },

    #[error("Length mismatch: {what} (expected {expected}, got {got})")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Convergence failed after {iterations} iterations: {what}")]
    ConvergenceFailed { what: String, iterations: usize },

    #[error("Numeric error: {what}")]
    Numeric { what: String },

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<SolverError> for CoreError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::InvalidInput { what: _ } => CoreError::InvalidArg { what: "input" },
            SolverError::InvalidDirection { index: _, what: _ } => {
                CoreError::InvalidArg { what: "direction" }
            }
            SolverError::LengthMismatch {
                what,
                expected,
                got,
            } => CoreError::IndexOob {
                what,
                index: got,
                len: expected,
            },
            SolverError::ConvergenceFailed { .. } => CoreError::Invariant {
                what: "convergence",
            },
            SolverError::Numeric { what: _ } => CoreError::Invariant { what: "numeric" },
            SolverError::Core(inner) => inner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = SolverError::InvalidDirection {
            index: 3,
            what: "norm 2 is not 1".into(),
        };
        assert!(err.to_string().contains("index 3"));

        let err = SolverError::ConvergenceFailed {
            what: "saddle point".into(),
            iterations: 50,
        };
        assert!(err.to_string().contains("50 iterations"));
    }

    #[test]
    fn error_to_core_error() {
        let core: CoreError = SolverError::Numeric {
            what: "nan step".into(),
        }
        .into();
        assert!(matches!(core, CoreError::Invariant { .. }));

        let inner = CoreError::InvalidArg { what: "q" };
        let core: CoreError = SolverError::from(inner.clone()).into();
        assert_eq!(core, inner);
    }
}
