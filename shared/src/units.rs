//! Type-safe angular units for image-plane transforms
//!
//! Rotations take a `uom` angle rather than a bare `f64`, so a value in
//! degrees can never be passed where radians are expected (and a plain
//! number cannot be passed as a rotation at all).

use uom::si::angle::{degree, radian};

/// Plane angle backed by `uom`
pub type Angle = uom::si::f64::Angle;

/// Extension trait for angle conversions
pub trait AngleExt {
    /// Create an angle from degrees
    fn from_degrees(degrees: f64) -> Self;

    /// Get the angle in degrees
    fn as_degrees(&self) -> f64;

    /// Create an angle from radians
    fn from_radians(radians: f64) -> Self;

    /// Get the angle in radians
    fn as_radians(&self) -> f64;
}

impl AngleExt for Angle {
    fn from_degrees(degrees: f64) -> Self {
        Angle::new::<degree>(degrees)
    }

    fn as_degrees(&self) -> f64 {
        self.get::<degree>()
    }

    fn from_radians(radians: f64) -> Self {
        Angle::new::<radian>(radians)
    }

    fn as_radians(&self) -> f64 {
        self.get::<radian>()
    }
}
