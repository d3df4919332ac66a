//! Inner Lagrange point (L1) on the line of centres.

use crate::error::{SolverError, SolverResult};
use crate::potential::RocheField;
use roche_core::{ConvergenceConfig, Real};
use tracing::{debug, trace};

/// Converged stationary point of the potential on the x axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SaddlePoint {
    pub x: Real,
    /// Potential at `x`, the reference level of a contact configuration
    pub psi: Real,
    pub iterations: usize,
}

/// Newton search on `dpsi/dx = 0` along `y = z = 0`.
///
/// Stops when the relative step `|dx / x|` drops to the configured
/// tolerance. The iteration cap is enforced here as well; exceeding it is
/// an error rather than a sentinel since there is no batch to protect.
#[derive(Clone, Copy, Debug)]
pub struct SaddlePointSolver {
    field: RocheField,
    config: ConvergenceConfig,
}

impl SaddlePointSolver {
    pub fn new(field: RocheField, config: ConvergenceConfig) -> SolverResult<Self> {
        config.validate()?;
        Ok(Self { field, config })
    }

    /// One Newton step from `x`: returns the next position and `dx / x_next`.
    pub fn saddle_step(&self, x: Real) -> (Real, Real) {
        let sample = self.field.evaluate(x, 0.0, 0.0);
        let d2psidx2 = self.field.axial_curvature(x, &sample);
        let dx = -sample.dpsidx / d2psidx2;
        let next = x + dx;
        (next, dx / next)
    }

    pub fn solve(&self, x0: Real) -> SolverResult<SaddlePoint> {
        if !x0.is_finite() || x0 == 0.0 || x0 == 1.0 {
            return Err(SolverError::InvalidInput {
                what: format!("saddle start must be finite and off both stars, got {x0}"),
            });
        }

        let max_iterations = self.config.max_iterations;
        let mut x = x0;
        let mut iteration = 0;
        loop {
            iteration += 1;
            if iteration > max_iterations {
                return Err(SolverError::ConvergenceFailed {
                    what: format!("saddle point from x0 = {x0}, last x = {x}"),
                    iterations: max_iterations,
                });
            }

            let (next, rel) = self.saddle_step(x);
            if !(next.is_finite() && rel.is_finite()) {
                return Err(SolverError::Numeric {
                    what: format!("non-finite saddle step at x = {x}"),
                });
            }
            x = next;
            trace!(iteration, x, rel, "saddle step");

            if rel.abs() <= self.config.tolerance {
                let psi = self.field.evaluate(x, 0.0, 0.0).psi;
                debug!(x, psi, iterations = iteration, "saddle point converged");
                return Ok(SaddlePoint {
                    x,
                    psi,
                    iterations: iteration,
                });
            }
        }
    }
}

/// Position of the inner Lagrange point, starting the search at `x0`.
pub fn saddle(
    x0: Real,
    q: Real,
    qp1by2om2: Real,
    config: &ConvergenceConfig,
) -> SolverResult<Real> {
    let field = RocheField::new(q, qp1by2om2)?;
    Ok(SaddlePointSolver::new(field, *config)?.solve(x0)?.x)
}
