//! Convergence policy shared by the radius and saddle solvers.

use crate::error::{CoreError, CoreResult};
use crate::numeric::Real;

/// Default absolute step tolerance.
pub const DEFAULT_TOLERANCE: Real = 1e-5;
/// Default iteration cap.
pub const DEFAULT_MAX_ITERATIONS: usize = 50;
/// Default value written for a radius that did not converge.
pub const DEFAULT_SENTINEL: Real = -99.99;

/// Tolerance, iteration cap and failure sentinel for one solve.
///
/// Passed explicitly to every solver so that boundary values
/// (e.g. `max_iterations = 1`) can be exercised without global state.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ConvergenceConfig {
    /// Stop once the Newton step magnitude drops to or below this value
    pub tolerance: Real,
    /// Maximum number of Newton iterations
    pub max_iterations: usize,
    /// Out-of-range radius reported for non-converged lanes
    pub sentinel: Real,
}

impl Default for ConvergenceConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            sentinel: DEFAULT_SENTINEL,
        }
    }
}

impl ConvergenceConfig {
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_tolerance(mut self, tolerance: Real) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn validate(&self) -> CoreResult<()> {
        if !self.tolerance.is_finite() {
            return Err(CoreError::NonFinite {
                what: "convergence tolerance",
                value: self.tolerance,
            });
        }
        if self.tolerance <= 0.0 {
            return Err(CoreError::InvalidArg {
                what: "convergence tolerance must be positive",
            });
        }
        if self.max_iterations == 0 {
            return Err(CoreError::InvalidArg {
                what: "max_iterations must be at least 1",
            });
        }
        // A radius is never negative, so any negative value is out of range.
        if !self.sentinel.is_finite() || self.sentinel >= 0.0 {
            return Err(CoreError::InvalidArg {
                what: "sentinel must be a finite negative value",
            });
        }
        Ok(())
    }
}
