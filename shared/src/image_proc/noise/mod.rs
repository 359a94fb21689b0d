//! Noise primitives for image simulation
//!
//! - **deviate**: shared Gaussian random stream used to synthesize noise fields
//! - **generate**: deterministic white-noise arrays for tests and sample images

pub mod deviate;
pub mod generate;

pub use deviate::GaussianDeviate;
pub use generate::simple_normal_array;
