//! Unit ray directions from the primary's centre.

use crate::error::{SolverError, SolverResult};
use nalgebra::Vector3;
use roche_core::Real;

/// Allowed deviation of a direction's norm from 1.
pub const UNIT_NORM_TOLERANCE: Real = 1e-6;

/// Direction cosines `(cosx, cosy, cosz)` of a ray in the corotating frame.
///
/// The solvers never normalise: a `Direction` is checked once on
/// construction and used as-is afterwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Direction {
    cosx: Real,
    cosy: Real,
    cosz: Real,
}

impl Direction {
    /// Build a direction from cosines that must already form a unit vector.
    pub fn new(cosx: Real, cosy: Real, cosz: Real) -> SolverResult<Self> {
        Self::checked(cosx, cosy, cosz).map_err(|what| SolverError::InvalidInput { what })
    }

    /// Normalise an arbitrary non-zero vector into a direction.
    pub fn normalize(v: Vector3<Real>) -> SolverResult<Self> {
        let norm = v.norm();
        if !norm.is_finite() || norm == 0.0 {
            return Err(SolverError::InvalidInput {
                what: format!("cannot normalise vector with norm {norm}"),
            });
        }
        let u = v / norm;
        Ok(Self {
            cosx: u.x,
            cosy: u.y,
            cosz: u.z,
        })
    }

    /// Like [`Direction::new`], reporting failures against a batch index.
    pub(crate) fn at_index(
        index: usize,
        cosx: Real,
        cosy: Real,
        cosz: Real,
    ) -> SolverResult<Self> {
        Self::checked(cosx, cosy, cosz)
            .map_err(|what| SolverError::InvalidDirection { index, what })
    }

    fn checked(cosx: Real, cosy: Real, cosz: Real) -> Result<Self, String> {
        if !(cosx.is_finite() && cosy.is_finite() && cosz.is_finite()) {
            return Err(format!("non-finite cosines ({cosx}, {cosy}, {cosz})"));
        }
        let norm = (cosx * cosx + cosy * cosy + cosz * cosz).sqrt();
        if (norm - 1.0).abs() > UNIT_NORM_TOLERANCE {
            return Err(format!("norm {norm} is not 1"));
        }
        Ok(Self { cosx, cosy, cosz })
    }

    pub fn cosx(&self) -> Real {
        self.cosx
    }

    pub fn cosy(&self) -> Real {
        self.cosy
    }

    pub fn cosz(&self) -> Real {
        self.cosz
    }

    /// Point at distance `r` along the ray.
    #[inline]
    pub fn at(&self, r: Real) -> (Real, Real, Real) {
        (r * self.cosx, r * self.cosy, r * self.cosz)
    }

    pub fn to_vector(&self) -> Vector3<Real> {
        Vector3::new(self.cosx, self.cosy, self.cosz)
    }
}

impl TryFrom<Vector3<Real>> for Direction {
    type Error = SolverError;

    fn try_from(v: Vector3<Real>) -> SolverResult<Self> {
        Self::new(v.x, v.y, v.z)
    }
}

impl TryFrom<[Real; 3]> for Direction {
    type Error = SolverError;

    fn try_from(c: [Real; 3]) -> SolverResult<Self> {
        Self::new(c[0], c[1], c[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_unit_vectors() {
        let d = Direction::new(0.6, 0.8, 0.0).unwrap();
        assert_eq!(d.at(2.0), (1.2, 1.6, 0.0));
        assert!(Direction::try_from([-1.0, 0.0, 0.0]).is_ok());
    }

    #[test]
    fn rejects_non_unit_and_non_finite() {
        assert!(matches!(
            Direction::new(1.0, 1.0, 0.0),
            Err(SolverError::InvalidInput { .. })
        ));
        assert!(Direction::new(0.0, 0.0, 0.0).is_err());
        assert!(Direction::new(Real::NAN, 0.0, 1.0).is_err());
        assert!(matches!(
            Direction::at_index(4, 0.0, 2.0, 0.0),
            Err(SolverError::InvalidDirection { index: 4, .. })
        ));
    }

    #[test]
    fn normalize_scales_to_unit_length() {
        let d = Direction::normalize(Vector3::new(0.0, 3.0, 4.0)).unwrap();
        assert!((d.to_vector().norm() - 1.0).abs() < 1e-15);
        assert!((d.cosy() - 0.6).abs() < 1e-15);
        assert!(Direction::normalize(Vector3::zeros()).is_err());
    }
}
