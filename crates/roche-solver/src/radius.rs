//! Newton search for the radius at which the potential reaches a target.

use crate::direction::Direction;
use crate::error::{SolverError, SolverResult};
use crate::potential::RocheField;
use roche_core::{BinaryParameters, ConvergenceConfig, Real};
use tracing::trace;

/// Outcome of one radius solve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RadiusResult {
    /// Non-negative radius in units of the orbital separation
    Converged(Real),
    /// Iteration cap reached, or the step became non-finite
    NotConverged,
}

impl RadiusResult {
    pub fn radius(self) -> Option<Real> {
        match self {
            RadiusResult::Converged(r) => Some(r),
            RadiusResult::NotConverged => None,
        }
    }

    pub fn is_converged(self) -> bool {
        matches!(self, RadiusResult::Converged(_))
    }

    /// Numeric form: the radius, or `sentinel` when not converged.
    pub fn to_raw(self, sentinel: Real) -> Real {
        self.radius().unwrap_or(sentinel)
    }

    pub fn from_raw(value: Real, sentinel: Real) -> Self {
        if value == sentinel {
            RadiusResult::NotConverged
        } else {
            RadiusResult::Converged(value)
        }
    }
}

/// Radius result plus the number of potential evaluations spent on it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadiusSolution {
    pub result: RadiusResult,
    pub iterations: usize,
}

/// One accepted iterate, as reported to progress callbacks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadiusProgress {
    pub iteration: usize,
    /// Radius after applying the step (or halving)
    pub radius: Real,
    /// Newton step `(psi - psi0) / dpsidr`
    pub step: Real,
}

/// Single-direction radius solver.
#[derive(Clone, Copy, Debug)]
pub struct RadiusSolver {
    field: RocheField,
    config: ConvergenceConfig,
}

impl RadiusSolver {
    pub fn new(field: RocheField, config: ConvergenceConfig) -> SolverResult<Self> {
        config.validate()?;
        Ok(Self { field, config })
    }

    pub fn field(&self) -> &RocheField {
        &self.field
    }

    pub fn config(&self) -> &ConvergenceConfig {
        &self.config
    }

    /// Newton step `dr` at radius `r`; the next iterate is `r - dr`.
    #[inline]
    pub fn newton_step(&self, direction: &Direction, r: Real, psi0: Real) -> Real {
        let (x, y, z) = direction.at(r);
        let sample = self.field.evaluate(x, y, z);
        (sample.psi - psi0) / sample.radial_derivative(direction)
    }

    /// Solve along `direction` for the radius where the potential is `psi0`.
    pub fn solve(
        &self,
        direction: &Direction,
        psi0: Real,
        r0: Real,
    ) -> SolverResult<RadiusSolution> {
        check_start(psi0, r0)?;
        Ok(self.iterate(direction, psi0, r0, |_| {}))
    }

    /// Like [`RadiusSolver::solve`], reporting every iterate to `on_step`.
    pub fn solve_with_progress<F>(
        &self,
        direction: &Direction,
        psi0: Real,
        r0: Real,
        on_step: F,
    ) -> SolverResult<RadiusSolution>
    where
        F: FnMut(&RadiusProgress),
    {
        check_start(psi0, r0)?;
        Ok(self.iterate(direction, psi0, r0, on_step))
    }

    /// The per-lane loop. Inputs must already be checked.
    pub(crate) fn iterate<F>(
        &self,
        direction: &Direction,
        psi0: Real,
        r0: Real,
        mut on_step: F,
    ) -> RadiusSolution
    where
        F: FnMut(&RadiusProgress),
    {
        let max_iterations = self.config.max_iterations;
        let mut r = r0;
        let mut iteration = 0;

        loop {
            iteration += 1;
            if iteration > max_iterations {
                trace!(max_iterations, r, "radius iteration cap reached");
                return RadiusSolution {
                    result: RadiusResult::NotConverged,
                    iterations: max_iterations,
                };
            }

            let dr = self.newton_step(direction, r, psi0);
            if !dr.is_finite() {
                trace!(iteration, r, "non-finite radius step");
                return RadiusSolution {
                    result: RadiusResult::NotConverged,
                    iterations: iteration,
                };
            }

            // Overshooting past the origin: halve instead.
            r = if r - dr < 0.0 { 0.5 * r } else { r - dr };
            on_step(&RadiusProgress {
                iteration,
                radius: r,
                step: dr,
            });

            if dr.abs() <= self.config.tolerance {
                return RadiusSolution {
                    result: RadiusResult::Converged(r),
                    iterations: iteration,
                };
            }
        }
    }
}

pub(crate) fn check_start(psi0: Real, r0: Real) -> SolverResult<()> {
    if !psi0.is_finite() {
        return Err(SolverError::InvalidInput {
            what: format!("target potential must be finite, got {psi0}"),
        });
    }
    if !(r0.is_finite() && r0 > 0.0) {
        return Err(SolverError::InvalidInput {
            what: format!("initial radius must be finite and positive, got {r0}"),
        });
    }
    Ok(())
}

/// Radius along `direction` where the potential equals `psi0`, or
/// `config.sentinel` if the solve does not converge.
pub fn radius(
    direction: &Direction,
    psi0: Real,
    r0: Real,
    q: Real,
    omega: Real,
    config: &ConvergenceConfig,
) -> SolverResult<Real> {
    let field = RocheField::from(BinaryParameters::new(q, omega)?);
    let solution = RadiusSolver::new(field, *config)?.solve(direction, psi0, r0)?;
    Ok(solution.result.to_raw(config.sentinel))
}
