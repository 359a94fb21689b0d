//! Shear and ellipse transforms of the image plane.
//!
//! An [`Ellipse`] combines a reduced [`Shear`], an isotropic dilation
//! `exp(mu)` and a translation. Its linear part is
//! `exp(mu) * S(g)` where `S(g)` is the unit-determinant shear matrix.

use super::{Position, ProfileError};
use meter_math::{scale_matrix, shear_matrix};
use nalgebra::Matrix2;

/// Reduced shear `(g1, g2)` with `|g| < 1`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Shear {
    g1: f64,
    g2: f64,
}

impl Shear {
    /// # Errors
    /// `InvalidShear` unless both components are finite and `|g| < 1`.
    pub fn new(g1: f64, g2: f64) -> Result<Self, ProfileError> {
        if !(g1.is_finite() && g2.is_finite()) || g1 * g1 + g2 * g2 >= 1.0 {
            return Err(ProfileError::InvalidShear { g1, g2 });
        }
        Ok(Self { g1, g2 })
    }

    pub fn identity() -> Self {
        Self::default()
    }

    pub fn g1(&self) -> f64 {
        self.g1
    }

    pub fn g2(&self) -> f64 {
        self.g2
    }

    /// Shear magnitude `|g|`
    pub fn magnitude(&self) -> f64 {
        self.g1.hypot(self.g2)
    }

    pub fn matrix(&self) -> Matrix2<f64> {
        shear_matrix(self.g1, self.g2)
    }
}

/// Shear, dilation and translation of the image plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    shear: Shear,
    mu: f64,
    shift: Position,
}

impl Default for Ellipse {
    fn default() -> Self {
        Self::new(Shear::identity(), 0.0, Position::origin())
    }
}

impl Ellipse {
    pub fn new(shear: Shear, mu: f64, shift: Position) -> Self {
        Self { shear, mu, shift }
    }

    /// Pure dilation by `exp(mu)`.
    pub fn dilation(mu: f64) -> Self {
        Self {
            mu,
            ..Self::default()
        }
    }

    pub fn from_shear(shear: Shear) -> Self {
        Self {
            shear,
            ..Self::default()
        }
    }

    /// Isotropic magnification by a linear factor `scale`.
    ///
    /// # Errors
    /// `InvalidScale` unless `scale` is finite and positive.
    pub fn magnification(scale: f64) -> Result<Self, ProfileError> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(ProfileError::InvalidScale(scale));
        }
        Ok(Self::dilation(scale.ln()))
    }

    pub fn with_shift(mut self, shift: Position) -> Self {
        self.shift = shift;
        self
    }

    pub fn without_shift(self) -> Self {
        self.with_shift(Position::origin())
    }

    pub fn has_shift(&self) -> bool {
        self.shift != Position::origin()
    }

    pub fn shear(&self) -> Shear {
        self.shear
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn shift(&self) -> Position {
        self.shift
    }

    /// Linear part `exp(mu) * S(g)`
    pub fn matrix(&self) -> Matrix2<f64> {
        let dilation = self.mu.exp();
        scale_matrix(dilation, dilation) * self.shear.matrix()
    }
}
