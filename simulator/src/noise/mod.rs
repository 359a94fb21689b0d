//! Correlated Gaussian noise
//!
//! This module models stationary noise fields through their 2D correlation
//! function and regenerates fields with that covariance:
//!
//! - **correlated**: [`CorrelatedNoise`], the correlation-function model with
//!   its variance algebra and geometric transforms
//! - **estimate**: FFT autocorrelation estimate of a model from a sample image
//! - **synthesize**: spectral synthesis of noise fields into images
//! - **spectral_cache**: per-model cache of root power spectra
//! - **covariance**: explicit pixel covariance matrices for small images
//! - **reference**: loading and saving stored correlation functions

pub mod correlated;
pub mod covariance;
pub mod estimate;
pub mod reference;
pub mod spectral_cache;
pub mod synthesize;

pub use correlated::CorrelatedNoise;
pub use covariance::covariance_matrix;
pub use estimate::{estimate_correlated_noise, symmetrized_correlation, EstimateConfig};
pub use reference::{load_reference_noise, save_reference_correlation, ReferenceCorrelation};
pub use spectral_cache::{RootSpectrum, SpectralCache};

use crate::profile::ProfileError;
use shared::image_proc::ImageError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by correlated-noise operations
#[derive(Error, Debug)]
pub enum CorrelatedNoiseError {
    #[error("image has undefined bounds")]
    UndefinedBounds,

    #[error("image has no pixels")]
    EmptyImage,

    #[error("variance must be zero or positive, got {0}")]
    NegativeVariance(f64),

    #[error("cannot rescale a correlation function with zero variance")]
    ZeroVariance,

    #[error("division by zero")]
    DivideByZero,

    #[error("variance scale factor must be non-negative and finite, got {0}")]
    InvalidScale(f64),

    #[error("magnification must be positive and finite, got {0}")]
    InvalidMagnification(f64),

    #[error("correlation function array must have odd, nonzero dimensions, got {rows}x{cols}")]
    InvalidCorrelationArray { rows: usize, cols: usize },

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid correlation function file {}: {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
