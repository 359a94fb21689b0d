//! One-dimensional interpolation kernels for gridded profiles.
//!
//! Kernels are applied separably in x and y by
//! [`InterpolatedImage`](super::interpolated::InterpolatedImage). Every
//! kernel equals 1 at zero offset and 0 at every other integer offset, so
//! evaluating an interpolated grid exactly on a sample point returns that
//! sample.

use std::f64::consts::PI;

/// Kernel family
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InterpolantKind {
    /// Nearest-neighbour (box) kernel
    Nearest,
    /// Linear (triangle) kernel; bilinear in 2D
    Linear,
    /// Keys cubic convolution kernel with a = -0.5
    Cubic,
    /// Lanczos kernel of order `n`
    Lanczos(u32),
}

/// Interpolation kernel with its accuracy tolerance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interpolant {
    kind: InterpolantKind,
    tolerance: f64,
}

impl Default for Interpolant {
    fn default() -> Self {
        Self::linear(Self::DEFAULT_TOLERANCE)
    }
}

impl Interpolant {
    /// Accuracy target used when no explicit tolerance is requested
    pub const DEFAULT_TOLERANCE: f64 = 1e-4;

    pub fn new(kind: InterpolantKind, tolerance: f64) -> Self {
        Self { kind, tolerance }
    }

    pub fn nearest(tolerance: f64) -> Self {
        Self::new(InterpolantKind::Nearest, tolerance)
    }

    pub fn linear(tolerance: f64) -> Self {
        Self::new(InterpolantKind::Linear, tolerance)
    }

    pub fn cubic(tolerance: f64) -> Self {
        Self::new(InterpolantKind::Cubic, tolerance)
    }

    /// Lanczos kernel; orders below 1 are clamped to 1.
    pub fn lanczos(order: u32, tolerance: f64) -> Self {
        Self::new(InterpolantKind::Lanczos(order.max(1)), tolerance)
    }

    pub fn kind(&self) -> InterpolantKind {
        self.kind
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Half-width of the kernel support in pixels.
    pub fn x_range(&self) -> f64 {
        match self.kind {
            InterpolantKind::Nearest => 0.5,
            InterpolantKind::Linear => 1.0,
            InterpolantKind::Cubic => 2.0,
            InterpolantKind::Lanczos(n) => n as f64,
        }
    }

    /// Kernel weight at offset `x` (in pixels).
    pub fn x_value(&self, x: f64) -> f64 {
        let ax = x.abs();
        match self.kind {
            InterpolantKind::Nearest => {
                if ax < 0.5 {
                    1.0
                } else if ax == 0.5 {
                    0.5
                } else {
                    0.0
                }
            }
            InterpolantKind::Linear => (1.0 - ax).max(0.0),
            InterpolantKind::Cubic => {
                if ax < 1.0 {
                    1.5 * ax * ax * ax - 2.5 * ax * ax + 1.0
                } else if ax < 2.0 {
                    -0.5 * ax * ax * ax + 2.5 * ax * ax - 4.0 * ax + 2.0
                } else {
                    0.0
                }
            }
            InterpolantKind::Lanczos(n) => {
                let n = n as f64;
                if ax >= n {
                    0.0
                } else {
                    sinc(ax) * sinc(ax / n)
                }
            }
        }
    }
}

/// Normalized sinc, sin(pi x) / (pi x)
fn sinc(x: f64) -> f64 {
    if x.abs() < 1e-8 {
        1.0
    } else {
        let px = PI * x;
        px.sin() / px
    }
}
