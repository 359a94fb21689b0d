//! Correlated noise modelling for astronomical image simulation
//!
//! This crate provides surface-brightness profiles and a correlated-noise
//! engine built on them: estimating a noise correlation function from a
//! sample image, regenerating noise fields with that covariance through
//! FFT spectral synthesis, and transforming or combining noise models.

pub mod noise;
pub mod profile;

// Re-exports for easier access
pub use noise::{
    estimate_correlated_noise, load_reference_noise, save_reference_correlation,
    CorrelatedNoise, CorrelatedNoiseError, EstimateConfig, SpectralCache,
};
pub use profile::{
    DrawOptions, Ellipse, Interpolant, InterpolatedImage, Normalization, Position, Profile,
    ProfileError, Shear,
};
