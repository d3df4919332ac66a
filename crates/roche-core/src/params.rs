//! Binary system parameters.

use crate::error::CoreResult;
use crate::numeric::{Real, ensure_positive};

/// Mass ratio and rotation rate of a binary in the corotating frame.
///
/// `q` is the companion mass over the primary mass. `omega` is the rotation
/// rate in units of the orbital angular frequency (1.0 means synchronous).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BinaryParameters {
    q: Real,
    omega: Real,
}

impl BinaryParameters {
    pub fn new(q: Real, omega: Real) -> CoreResult<Self> {
        let q = ensure_positive(q, "mass ratio q")?;
        let omega = ensure_positive(omega, "rotation rate omega")?;
        Ok(Self { q, omega })
    }

    /// Synchronously rotating binary (`omega = 1`).
    pub fn synchronous(q: Real) -> CoreResult<Self> {
        Self::new(q, 1.0)
    }

    pub fn q(&self) -> Real {
        self.q
    }

    pub fn omega(&self) -> Real {
        self.omega
    }

    /// Centrifugal coefficient `(q + 1) / 2 * omega^2`.
    pub fn qp1by2om2(&self) -> Real {
        (self.q + 1.0) / 2.0 * self.omega * self.omega
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CoreError;

    #[test]
    fn synchronous_coefficient() {
        let params = BinaryParameters::synchronous(56.0).unwrap();
        assert_eq!(params.omega(), 1.0);
        assert_eq!(params.qp1by2om2(), 28.5);
    }

    #[test]
    fn coefficient_scales_with_omega_squared() {
        let params = BinaryParameters::new(1.0, 2.0).unwrap();
        assert_eq!(params.qp1by2om2(), 4.0);
    }

    #[test]
    fn rejects_unphysical_inputs() {
        assert!(matches!(
            BinaryParameters::new(0.0, 1.0),
            Err(CoreError::InvalidArg { .. })
        ));
        assert!(matches!(
            BinaryParameters::new(1.0, -0.5),
            Err(CoreError::InvalidArg { .. })
        ));
        assert!(matches!(
            BinaryParameters::new(Real::NAN, 1.0),
            Err(CoreError::NonFinite { .. })
        ));
    }
}
