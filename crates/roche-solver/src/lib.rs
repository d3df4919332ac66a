//! Roche-potential solvers for close binaries.
//!
//! This crate evaluates the Roche potential in the corotating frame and
//! solves for the radius at which it reaches a target value, one direction
//! at a time or across a batch in parallel. It also locates the inner
//! Lagrange point, whose potential is the reference level for contact
//! configurations.

pub mod batch;
pub mod direction;
pub mod error;
pub mod potential;
pub mod radius;
pub mod saddle;

pub use batch::{BatchRadiusSolver, Execution, directions_from_cosines, radii, radii_from_cosines};
pub use direction::Direction;
pub use error::{SolverError, SolverResult};
pub use potential::{PotentialSample, RocheField, potential};
pub use radius::{RadiusProgress, RadiusResult, RadiusSolution, RadiusSolver, radius};
pub use saddle::{SaddlePoint, SaddlePointSolver, saddle};
