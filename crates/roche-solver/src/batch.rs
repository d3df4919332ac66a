//! Radius solves over many directions sharing the same parameters.
//!
//! Lanes are independent: each reads the shared scalars, runs the
//! single-direction loop from the same starting radius and writes only its
//! own output slot. The sequential and parallel paths call the same
//! per-lane routine, so they agree bit for bit.

use crate::direction::Direction;
use crate::error::{SolverError, SolverResult};
use crate::potential::RocheField;
use crate::radius::{RadiusResult, RadiusSolver, check_start};
use rayon::prelude::*;
use roche_core::timing::Timer;
use roche_core::{BinaryParameters, ConvergenceConfig, Real};
use tracing::{debug, warn};

/// How a batch is executed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Execution {
    /// Rayon parallel map on the global pool.
    #[default]
    Parallel,
    /// Parallel map on a dedicated pool of `n` threads.
    ParallelWith(usize),
    /// Plain loop on the calling thread.
    Sequential,
}

/// Applies [`RadiusSolver`] independently to every direction of a batch.
#[derive(Clone, Copy, Debug)]
pub struct BatchRadiusSolver {
    solver: RadiusSolver,
    execution: Execution,
}

impl BatchRadiusSolver {
    pub fn new(field: RocheField, config: ConvergenceConfig) -> SolverResult<Self> {
        Ok(Self {
            solver: RadiusSolver::new(field, config)?,
            execution: Execution::default(),
        })
    }

    pub fn with_execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    pub fn execution(&self) -> Execution {
        self.execution
    }

    pub fn solver(&self) -> &RadiusSolver {
        &self.solver
    }

    /// One result per direction, index-aligned with `directions`.
    pub fn solve(
        &self,
        directions: &[Direction],
        psi0: Real,
        r0: Real,
    ) -> SolverResult<Vec<RadiusResult>> {
        check_start(psi0, r0)?;
        let timer = Timer::start("batch radius solve");

        let mut out = vec![RadiusResult::NotConverged; directions.len()];
        match self.execution {
            Execution::Sequential => self.fill_sequential(&mut out, directions, psi0, r0),
            Execution::Parallel => self.fill_parallel(&mut out, directions, psi0, r0),
            Execution::ParallelWith(threads) => {
                match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                    Ok(pool) => pool.install(|| self.fill_parallel(&mut out, directions, psi0, r0)),
                    Err(e) => {
                        warn!(threads, error = %e, "thread pool unavailable, solving sequentially");
                        self.fill_sequential(&mut out, directions, psi0, r0);
                    }
                }
            }
        }

        let failed = out.iter().filter(|r| !r.is_converged()).count();
        debug!(lanes = out.len(), failed, execution = ?self.execution, "batch radius solve done");
        timer.stop_and_log();
        Ok(out)
    }

    /// Numeric form of [`BatchRadiusSolver::solve`]: failed lanes hold the
    /// configured sentinel.
    pub fn solve_raw(
        &self,
        directions: &[Direction],
        psi0: Real,
        r0: Real,
    ) -> SolverResult<Vec<Real>> {
        let sentinel = self.solver.config().sentinel;
        Ok(self
            .solve(directions, psi0, r0)?
            .into_iter()
            .map(|r| r.to_raw(sentinel))
            .collect())
    }

    fn fill_sequential(
        &self,
        out: &mut [RadiusResult],
        directions: &[Direction],
        psi0: Real,
        r0: Real,
    ) {
        for (slot, direction) in out.iter_mut().zip(directions) {
            *slot = self.solve_lane(direction, psi0, r0);
        }
    }

    fn fill_parallel(
        &self,
        out: &mut [RadiusResult],
        directions: &[Direction],
        psi0: Real,
        r0: Real,
    ) {
        out.par_iter_mut()
            .zip(directions.par_iter())
            .for_each(|(slot, direction)| *slot = self.solve_lane(direction, psi0, r0));
    }

    #[inline]
    fn solve_lane(&self, direction: &Direction, psi0: Real, r0: Real) -> RadiusResult {
        self.solver.iterate(direction, psi0, r0, |_| {}).result
    }
}

/// Build directions from three parallel cosine arrays.
pub fn directions_from_cosines(
    cosx: &[Real],
    cosy: &[Real],
    cosz: &[Real],
) -> SolverResult<Vec<Direction>> {
    for (what, other) in [("cosy", cosy.len()), ("cosz", cosz.len())] {
        if other != cosx.len() {
            return Err(SolverError::LengthMismatch {
                what,
                expected: cosx.len(),
                got: other,
            });
        }
    }
    cosx.iter()
        .zip(cosy)
        .zip(cosz)
        .enumerate()
        .map(|(i, ((&cx, &cy), &cz))| Direction::at_index(i, cx, cy, cz))
        .collect()
}

/// Radii along every direction, with `config.sentinel` for lanes that do
/// not converge.
pub fn radii(
    directions: &[Direction],
    psi0: Real,
    r0: Real,
    q: Real,
    omega: Real,
    config: &ConvergenceConfig,
) -> SolverResult<Vec<Real>> {
    let field = RocheField::from(BinaryParameters::new(q, omega)?);
    BatchRadiusSolver::new(field, *config)?.solve_raw(directions, psi0, r0)
}

/// [`radii`] over the three-array cosine layout.
#[allow(clippy::too_many_arguments)]
pub fn radii_from_cosines(
    cosx: &[Real],
    cosy: &[Real],
    cosz: &[Real],
    psi0: Real,
    r0: Real,
    q: Real,
    omega: Real,
    config: &ConvergenceConfig,
) -> SolverResult<Vec<Real>> {
    let directions = directions_from_cosines(cosx, cosy, cosz)?;
    radii(&directions, psi0, r0, q, omega, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(execution: Execution) -> BatchRadiusSolver {
        BatchRadiusSolver::new(RocheField::new(56.0, 28.5).unwrap(), ConvergenceConfig::default())
            .unwrap()
            .with_execution(execution)
    }

    fn meridian(degrees: &[f64]) -> Vec<Direction> {
        degrees
            .iter()
            .map(|deg| {
                let t = deg.to_radians();
                Direction::new(t.sin(), 0.0, t.cos()).unwrap()
            })
            .collect()
    }

    #[test]
    fn empty_batch_is_empty() {
        assert!(batch(Execution::Parallel).solve(&[], 100.0, 0.14).unwrap().is_empty());
    }

    #[test]
    fn sentinel_only_where_lane_fails() {
        // At psi0 = 20 the rays near the pole close, the one at 60 degrees never does
        let dirs = meridian(&[0.0, 10.0, 20.0, 30.0, 60.0, 45.0]);
        let raw = batch(Execution::Parallel).solve_raw(&dirs, 20.0, 0.14).unwrap();
        assert_eq!(raw.len(), dirs.len());
        for (i, r) in raw.iter().enumerate() {
            if i == 4 {
                assert_eq!(*r, -99.99);
            } else {
                assert!(*r > 0.0, "lane {i} returned {r}");
            }
        }
    }

    #[test]
    fn execution_modes_agree_exactly() {
        let dirs = meridian(&[0.0, 15.0, 33.0, 47.0, 71.0, 90.0, 120.0, 180.0]);
        let seq = batch(Execution::Sequential).solve(&dirs, 80.0, 0.14).unwrap();
        let par = batch(Execution::Parallel).solve(&dirs, 80.0, 0.14).unwrap();
        let pool = batch(Execution::ParallelWith(2)).solve(&dirs, 80.0, 0.14).unwrap();
        assert_eq!(seq, par);
        assert_eq!(seq, pool);
    }

    #[test]
    fn lanes_match_single_solves() {
        let dirs = meridian(&[5.0, 50.0, 95.0, 175.0]);
        let b = batch(Execution::Parallel);
        let results = b.solve(&dirs, 80.0, 0.14).unwrap();
        for (d, r) in dirs.iter().zip(&results) {
            assert_eq!(b.solver().solve(d, 80.0, 0.14).unwrap().result, *r);
        }
    }

    #[test]
    fn cosine_arrays_are_checked() {
        let err = directions_from_cosines(&[1.0, 0.0], &[0.0], &[0.0, 1.0]).unwrap_err();
        assert!(matches!(err, SolverError::LengthMismatch { what: "cosy", .. }));

        let err = directions_from_cosines(&[1.0, 0.5], &[0.0, 0.0], &[0.0, 0.0]).unwrap_err();
        assert!(matches!(err, SolverError::InvalidDirection { index: 1, .. }));
    }

    #[test]
    fn radii_from_cosines_matches_docstring_example() {
        let cfg = ConvergenceConfig::default();
        let out = radii_from_cosines(
            &[-1.0, 0.0, 0.0],
            &[0.0, 1.0, 0.0],
            &[0.0, 0.0, 1.0],
            5454.0,
            0.14,
            56.0,
            1.0,
            &cfg,
        )
        .unwrap();
        assert_eq!(out.len(), 3);
        assert!((out[0] - 1.847_654_415_060_530_8e-4).abs() < 1e-12);
        assert!((out[1] - 1.847_654_414_113_763e-4).abs() < 1e-12);
        assert!((out[2] - 1.847_654_413_792_505_4e-4).abs() < 1e-12);
    }
}
