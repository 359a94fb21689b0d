//! Image containers and noise primitives for astronomical image simulation.
//!
//! # Module Organization
//!
//! - **bounds**: inclusive integer pixel bounds, possibly undefined
//! - **image**: `Array2<f64>` pixel buffer paired with bounds and a pixel scale
//! - **noise**: shared Gaussian deviate stream and white-noise generators
//!
//! Arrays are indexed `[row, col]`, i.e. `[y, x]`, everywhere in this crate.

pub mod bounds;
pub mod image;
pub mod noise;

pub use bounds::Bounds;
pub use image::{normalize_scale, Image, ImageError};
pub use noise::{simple_normal_array, GaussianDeviate};
