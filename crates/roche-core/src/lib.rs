//! roche-core: shared foundation for the Roche-lobe solvers.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - params (binary parameters consumed by the potential)
//! - config (convergence policy threaded into every solver)
//! - timing (opt-in wall-clock timers)
//! - error (shared error types)

pub mod config;
pub mod error;
pub mod numeric;
pub mod params;
pub mod timing;

// Re-exports: nice ergonomics for downstream crates
pub use config::ConvergenceConfig;
pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use params::BinaryParameters;
