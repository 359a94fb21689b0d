//! Estimate a correlation function from a sample noise image.
//!
//! The autocorrelation is computed through the power spectrum
//! `|F(image)|²`, rolled so zero lag sits at the array centre, then padded
//! to odd dimensions with the missing mirror row/column filled in so the
//! result is point-symmetric about its centre pixel.

use super::correlated::CorrelatedNoise;
use super::CorrelatedNoiseError;
use crate::profile::{Interpolant, InterpolatedImage, Normalization, Profile};
use log::debug;
use ndarray::{s, Array2};
use rustfft::num_complex::Complex64;
use shared::algo::{fft2_real, ifft2, roll2d};
use shared::image_proc::{GaussianDeviate, Image};

/// Estimator settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimateConfig {
    /// Pixel scale of the sample image; overrides the image's own scale
    /// when positive
    pub scale: Option<f64>,
    /// Kernel used to interpolate the gridded correlation function
    pub interpolant: Interpolant,
}

impl Default for EstimateConfig {
    fn default() -> Self {
        Self {
            scale: None,
            interpolant: Interpolant::linear(Interpolant::DEFAULT_TOLERANCE),
        }
    }
}

impl EstimateConfig {
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_interpolant(mut self, interpolant: Interpolant) -> Self {
        self.interpolant = interpolant;
        self
    }
}

/// Correlation function and power spectrum of a sample array.
///
/// Returns `(cf, ps)`: `cf` has odd dimensions `1 + 2 * (n / 2)` on each
/// axis with zero lag at its centre; `ps` is the power spectrum with the
/// sample's shape.
pub fn symmetrized_correlation(sample: &Array2<f64>) -> (Array2<f64>, Array2<f64>) {
    let (rows, cols) = sample.dim();
    let npix = sample.len() as f64;

    let ps = fft2_real(sample).mapv(|v| v.norm_sqr());
    let prelim = ifft2(&ps.mapv(|v| Complex64::new(v, 0.0))).mapv(|v| v.re / npix);
    let prelim = roll2d(&prelim, (rows / 2, cols / 2));

    let mut cf = Array2::<f64>::zeros((1 + 2 * (rows / 2), 1 + 2 * (cols / 2)));
    cf.slice_mut(s![..rows, ..cols]).assign(&prelim);

    // Even axes have no slot for the mirror of their first lag; copy it in
    // reversed, x first, then y
    if cols % 2 == 0 {
        let first_column = cf.column(0).to_owned();
        cf.column_mut(cols).assign(&first_column.slice(s![..;-1]));
    }
    if rows % 2 == 0 {
        let first_row = cf.row(0).to_owned();
        cf.row_mut(rows).assign(&first_row.slice(s![..;-1]));
    }

    (cf, ps)
}

impl CorrelatedNoise {
    /// Estimate the noise correlation function of `image`.
    ///
    /// The pixel scale is `config.scale` if positive, else the image's scale
    /// if positive, else 1.0. The spectral cache is seeded with the sample's
    /// root power spectrum at that scale, so synthesizing noise on a grid
    /// matching the sample needs no further FFT of the profile.
    ///
    /// # Errors
    /// `UndefinedBounds` or `EmptyImage` when there is nothing to estimate
    /// from.
    pub fn from_image(
        image: &Image,
        rng: GaussianDeviate,
        config: &EstimateConfig,
    ) -> Result<Self, CorrelatedNoiseError> {
        if !image.bounds().is_defined() {
            return Err(CorrelatedNoiseError::UndefinedBounds);
        }
        if image.array().is_empty() {
            return Err(CorrelatedNoiseError::EmptyImage);
        }

        let (cf, ps) = symmetrized_correlation(image.array());
        debug!(
            "Estimated {:?} correlation function from {:?} sample",
            cf.dim(),
            image.shape()
        );

        let scale = match config.scale {
            Some(dx) if dx.is_finite() && dx > 0.0 => dx,
            _ => image.effective_scale(),
        };

        let interpolated = InterpolatedImage::new(
            cf,
            scale,
            config.interpolant,
            Normalization::SurfaceBrightness,
        )?;

        let mut noise = Self::from_profile(Profile::interpolated(interpolated), rng);
        noise.cache.store(ps.mapv(f64::sqrt), scale);
        Ok(noise)
    }
}

/// Estimate a correlated-noise model from `image` with default settings.
pub fn estimate_correlated_noise(
    image: &Image,
    rng: GaussianDeviate,
) -> Result<CorrelatedNoise, CorrelatedNoiseError> {
    CorrelatedNoise::from_image(image, rng, &EstimateConfig::default())
}
