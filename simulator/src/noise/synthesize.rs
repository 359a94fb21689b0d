//! Spectral synthesis of correlated noise fields.
//!
//! A field with correlation function `cf` on an `N`-pixel grid is made by
//! weighting Gaussian deviates with the root power spectrum
//! `sqrt(N |F(cf)|)` and inverse transforming. Only the real part of the
//! complex synthesis is kept, so it is scaled by `sqrt(2)` to restore the
//! full variance. This costs `O(N log N)` per field, against `O(N³)` for an
//! eigendecomposition of the explicit covariance matrix.
//!
//! The deviates are real, so the synthesized field is point-symmetric about
//! the array origin: pixel `[i, j]` equals pixel `[-i mod rows, -j mod cols]`.

use super::correlated::CorrelatedNoise;
use super::CorrelatedNoiseError;
use crate::profile::{DrawOptions, Normalization};
use ndarray::{Array2, Zip};
use rustfft::num_complex::Complex64;
use shared::algo::{fft2_real, ifft2};
use shared::image_proc::Image;
use std::f64::consts::SQRT_2;

/// Root power spectrum `sqrt(N |F(cf)|)` of a rendered correlation function.
pub fn root_power_spectrum(rendered: &Array2<f64>) -> Array2<f64> {
    let npix = rendered.len() as f64;
    fft2_real(rendered).mapv(|v| (v.norm() * npix).sqrt())
}

/// Noise field `sqrt(2) * Re(ifft2(deviates * root))`.
///
/// `deviates` and `root` must have the same shape.
pub fn synthesize_field(root: &Array2<f64>, deviates: &Array2<f64>) -> Array2<f64> {
    let spectrum = Zip::from(deviates)
        .and(root)
        .map_collect(|&g, &r| Complex64::new(g * r, 0.0));
    ifft2(&spectrum).mapv(|v| SQRT_2 * v.re)
}

impl CorrelatedNoise {
    /// Add a realization of this noise to `image`.
    ///
    /// The image's scale (1.0 if unset) selects the grid the correlation
    /// function is rendered on. The root power spectrum for the image's
    /// shape and scale comes from the spectral cache when present and is
    /// computed and cached otherwise. Deviates are drawn from the model's
    /// shared random stream.
    ///
    /// # Errors
    /// `UndefinedBounds` or `EmptyImage` before any computation when the
    /// image has no pixel grid.
    pub fn apply_to(&mut self, image: &mut Image) -> Result<(), CorrelatedNoiseError> {
        let bounds = image.bounds();
        if !bounds.is_defined() {
            return Err(CorrelatedNoiseError::UndefinedBounds);
        }
        let shape = image.shape();
        if shape.0 == 0 || shape.1 == 0 {
            return Err(CorrelatedNoiseError::EmptyImage);
        }
        let scale = image.effective_scale();

        let profile = &self.profile;
        let root = self.cache.get_or_try_insert_with(shape, scale, || {
            let mut rendered = Image::new(bounds, scale);
            let options = DrawOptions {
                scale: Some(scale),
                normalization: Normalization::SurfaceBrightness,
                gain: 1.0,
                add_to_image: false,
            };
            profile.draw(&mut rendered, &options)?;
            Ok::<_, CorrelatedNoiseError>(root_power_spectrum(rendered.array()))
        })?;

        let deviates = self.rng.fill(shape);
        let field = synthesize_field(root, &deviates);
        image.add_array(&field)?;
        Ok(())
    }
}
