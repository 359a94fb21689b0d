//! Numerical building blocks for image simulation
//!
//! This module provides 2D Fourier transforms on ndarray grids and the
//! statistical helpers used to validate synthesized noise fields.

pub mod fft2d;
pub mod stats;

pub use fft2d::{fft2, fft2_real, ifft2, roll2d};
pub use stats::{ks_critical_value, ks_test_normal, mean_and_variance, pearson_correlation};
