//! Correlation-function model of a stationary Gaussian noise field.
//!
//! [`CorrelatedNoise`] wraps a [`Profile`] that is taken to be the 2D
//! correlation function of the noise: even under `p -> -p` and peaked at the
//! origin, where its value is the point variance. Shifting such a profile is
//! meaningless, so the wrapper exposes no shift and drops the translation
//! component of any transform applied through it.
//!
//! Every instance owns a [`SpectralCache`]. Replacing the profile (transforms,
//! in-place addition) clears the cache; variance scaling rescales the cached
//! spectra instead.
//!
//! The random stream is shared by [`Clone`], by the `create_*` transforms
//! and by [`CorrelatedNoise::add`], which keeps the left operand's stream.

use super::covariance::covariance_matrix;
use super::spectral_cache::SpectralCache;
use super::CorrelatedNoiseError;
use crate::profile::{DrawOptions, Ellipse, Normalization, Position, Profile, Shear};
use log::debug;
use ndarray::Array2;
use shared::image_proc::{Bounds, GaussianDeviate, Image};
use shared::units::Angle;
use std::ops::{Add, AddAssign};

/// Correlated Gaussian noise described by its correlation function
#[derive(Debug)]
pub struct CorrelatedNoise {
    pub(super) profile: Profile,
    pub(super) rng: GaussianDeviate,
    pub(super) cache: SpectralCache,
}

impl Clone for CorrelatedNoise {
    /// Copy the model. The copy shares the random stream and starts with an
    /// empty spectral cache.
    fn clone(&self) -> Self {
        Self::from_profile(self.profile.clone(), self.rng.clone())
    }
}

impl CorrelatedNoise {
    /// Wrap a profile that is already a valid correlation function.
    ///
    /// No symmetry check is made: the caller vouches that `profile` is even
    /// and peaked at the origin.
    pub fn from_profile(profile: Profile, rng: GaussianDeviate) -> Self {
        Self {
            profile,
            rng,
            cache: SpectralCache::new(),
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn rng(&self) -> &GaussianDeviate {
        &self.rng
    }

    /// Replace the random stream used by later noise synthesis.
    pub fn set_rng(&mut self, rng: GaussianDeviate) {
        self.rng = rng;
    }

    pub fn spectral_cache(&self) -> &SpectralCache {
        &self.cache
    }

    fn replace_profile(&mut self, profile: Profile) {
        self.profile = profile;
        self.cache.invalidate();
    }

    /// Point variance: the correlation function at zero separation.
    pub fn variance(&self) -> f64 {
        self.profile.x_value(Position::origin())
    }

    /// Multiply the correlation function, and so the variance, by `factor`.
    ///
    /// # Errors
    /// `InvalidScale` for a negative or non-finite factor.
    pub fn scale_variance(&mut self, factor: f64) -> Result<(), CorrelatedNoiseError> {
        if !(factor.is_finite() && factor >= 0.0) {
            return Err(CorrelatedNoiseError::InvalidScale(factor));
        }
        self.profile.scale_flux(factor);
        self.cache.rescale(factor.sqrt());
        Ok(())
    }

    /// Rescale so that the point variance equals `variance`.
    ///
    /// # Errors
    /// `NegativeVariance` for a negative target, `ZeroVariance` when the
    /// current variance is zero.
    pub fn set_variance(&mut self, variance: f64) -> Result<(), CorrelatedNoiseError> {
        if variance.is_nan() || variance < 0.0 {
            return Err(CorrelatedNoiseError::NegativeVariance(variance));
        }
        let current = self.variance();
        if current == 0.0 {
            return Err(CorrelatedNoiseError::ZeroVariance);
        }
        self.scale_variance(variance / current)
    }

    /// Point standard deviation, `sqrt(variance)`
    pub fn sigma(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn set_sigma(&mut self, sigma: f64) -> Result<(), CorrelatedNoiseError> {
        self.set_variance(sigma * sigma)
    }

    pub fn scale_in_place(&mut self, factor: f64) -> Result<(), CorrelatedNoiseError> {
        self.scale_variance(factor)
    }

    /// Copy with the variance multiplied by `factor`.
    pub fn scale(&self, factor: f64) -> Result<Self, CorrelatedNoiseError> {
        let mut scaled = self.clone();
        scaled.scale_in_place(factor)?;
        Ok(scaled)
    }

    pub fn divide_in_place(&mut self, divisor: f64) -> Result<(), CorrelatedNoiseError> {
        if divisor == 0.0 {
            return Err(CorrelatedNoiseError::DivideByZero);
        }
        self.scale_variance(1.0 / divisor)
    }

    /// Copy with the variance divided by `divisor`.
    pub fn divide(&self, divisor: f64) -> Result<Self, CorrelatedNoiseError> {
        let mut scaled = self.clone();
        scaled.divide_in_place(divisor)?;
        Ok(scaled)
    }

    /// Model of the sum of two independent noise fields. The result keeps
    /// this model's random stream.
    pub fn add(&self, other: &CorrelatedNoise) -> CorrelatedNoise {
        Self::from_profile(self.profile.add(&other.profile), self.rng.clone())
    }

    /// Add `other`'s correlation function into this model, keeping this
    /// model's random stream.
    pub fn add_in_place(&mut self, other: &CorrelatedNoise) {
        let sum = self.profile.add(&other.profile);
        self.replace_profile(sum);
    }

    /// Shear and dilate the correlation function. Any shift in `ellipse` is
    /// dropped.
    pub fn apply_transformation(&mut self, ellipse: &Ellipse) -> Result<(), CorrelatedNoiseError> {
        let ellipse = if ellipse.has_shift() {
            debug!(
                "Dropping shift {:?} from correlation function transform",
                ellipse.shift()
            );
            ellipse.without_shift()
        } else {
            *ellipse
        };

        let mut profile = self.profile.clone();
        profile.apply_transformation(&ellipse)?;
        self.replace_profile(profile);
        Ok(())
    }

    /// Scale the linear size of correlations by `scale`.
    ///
    /// # Errors
    /// `InvalidMagnification` unless `scale` is finite and positive.
    pub fn apply_magnification(&mut self, scale: f64) -> Result<(), CorrelatedNoiseError> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(CorrelatedNoiseError::InvalidMagnification(scale));
        }
        self.apply_transformation(&Ellipse::magnification(scale)?)
    }

    /// Rotate counter-clockwise by `angle`.
    pub fn apply_rotation(&mut self, angle: Angle) {
        let mut profile = self.profile.clone();
        profile.apply_rotation(angle);
        self.replace_profile(profile);
    }

    pub fn apply_shear(&mut self, shear: Shear) {
        let mut profile = self.profile.clone();
        profile.apply_shear(shear);
        self.replace_profile(profile);
    }

    pub fn create_transformed(&self, ellipse: &Ellipse) -> Result<Self, CorrelatedNoiseError> {
        let mut transformed = self.clone();
        transformed.apply_transformation(ellipse)?;
        Ok(transformed)
    }

    pub fn create_magnified(&self, scale: f64) -> Result<Self, CorrelatedNoiseError> {
        let mut magnified = self.clone();
        magnified.apply_magnification(scale)?;
        Ok(magnified)
    }

    pub fn create_rotated(&self, angle: Angle) -> Self {
        let mut rotated = self.clone();
        rotated.apply_rotation(angle);
        rotated
    }

    pub fn create_sheared(&self, shear: Shear) -> Self {
        let mut sheared = self.clone();
        sheared.apply_shear(shear);
        sheared
    }

    /// Render the correlation function into `image` as surface-brightness
    /// samples with unit gain. `dx` overrides the image's pixel scale.
    pub fn draw(
        &self,
        image: &mut Image,
        dx: Option<f64>,
        add_to_image: bool,
    ) -> Result<(), CorrelatedNoiseError> {
        let options = DrawOptions {
            scale: dx,
            normalization: Normalization::SurfaceBrightness,
            gain: 1.0,
            add_to_image,
        };
        self.profile.draw(image, &options)?;
        Ok(())
    }

    /// Pixel covariance matrix for an image with `bounds` and pixel scale
    /// `dx`. See [`covariance_matrix`].
    pub fn calculate_covariance_matrix(
        &self,
        bounds: Bounds,
        dx: f64,
    ) -> Result<Array2<f64>, CorrelatedNoiseError> {
        covariance_matrix(&self.profile, bounds, dx)
    }
}

impl Add<&CorrelatedNoise> for &CorrelatedNoise {
    type Output = CorrelatedNoise;

    fn add(self, rhs: &CorrelatedNoise) -> CorrelatedNoise {
        CorrelatedNoise::add(self, rhs)
    }
}

impl Add for CorrelatedNoise {
    type Output = CorrelatedNoise;

    fn add(self, rhs: CorrelatedNoise) -> CorrelatedNoise {
        CorrelatedNoise::add(&self, &rhs)
    }
}

impl AddAssign<&CorrelatedNoise> for CorrelatedNoise {
    fn add_assign(&mut self, rhs: &CorrelatedNoise) {
        self.add_in_place(rhs);
    }
}

impl AddAssign for CorrelatedNoise {
    fn add_assign(&mut self, rhs: CorrelatedNoise) {
        self.add_in_place(&rhs);
    }
}
