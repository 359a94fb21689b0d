//! Stored reference correlation functions.
//!
//! A reference correlation function is a gridded, odd-sized,
//! point-symmetric array with zero separation at its centre pixel, plus the
//! pixel scale it was sampled at. Files are JSON:
//!
//! ```json
//! { "scale": 0.03, "data": { "v": 1, "dim": [3, 3], "data": [ ... ] } }
//! ```
//!
//! Loaded arrays are trusted to be valid correlation functions apart from a
//! dimension check; they are wrapped directly without re-estimation.

use super::correlated::CorrelatedNoise;
use super::CorrelatedNoiseError;
use crate::profile::{Interpolant, InterpolatedImage, Normalization, Profile};
use log::{info, warn};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use shared::image_proc::{normalize_scale, GaussianDeviate, Image};
use std::path::Path;

/// Gridded correlation function with its pixel scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceCorrelation {
    pub scale: f64,
    pub data: Array2<f64>,
}

impl ReferenceCorrelation {
    /// Capture an image of a correlation function, e.g. one drawn with
    /// [`CorrelatedNoise::draw`].
    pub fn from_image(image: &Image) -> Self {
        Self {
            scale: image.effective_scale(),
            data: image.array().clone(),
        }
    }

    /// Both dimensions must be odd so the centre pixel is zero separation.
    pub fn validate(&self) -> Result<(), CorrelatedNoiseError> {
        let (rows, cols) = self.data.dim();
        if rows % 2 == 0 || cols % 2 == 0 {
            return Err(CorrelatedNoiseError::InvalidCorrelationArray { rows, cols });
        }
        Ok(())
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), CorrelatedNoiseError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| {
            CorrelatedNoiseError::Format {
                path: path.to_path_buf(),
                source,
            }
        })?;
        std::fs::write(path, json).map_err(|source| CorrelatedNoiseError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load_from_file(path: &Path) -> Result<Self, CorrelatedNoiseError> {
        let json = std::fs::read_to_string(path).map_err(|source| CorrelatedNoiseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| {
            warn!(
                "Unable to parse correlation function from {}: {}",
                path.display(),
                source
            );
            CorrelatedNoiseError::Format {
                path: path.to_path_buf(),
                source,
            }
        })
    }
}

/// Load a stored correlation function as a noise model.
///
/// `scale` overrides the stored pixel scale when positive. A positive
/// `variance` rescales the model to that point variance; zero keeps the
/// stored variance.
///
/// # Errors
/// `NegativeVariance` before the file is touched, `Io` or `Format` if it
/// cannot be read or parsed, `InvalidCorrelationArray` for even dimensions.
pub fn load_reference_noise(
    path: impl AsRef<Path>,
    rng: GaussianDeviate,
    scale: Option<f64>,
    variance: f64,
) -> Result<CorrelatedNoise, CorrelatedNoiseError> {
    if variance.is_nan() || variance < 0.0 {
        return Err(CorrelatedNoiseError::NegativeVariance(variance));
    }

    let path = path.as_ref();
    let reference = ReferenceCorrelation::load_from_file(path)?;
    reference.validate()?;

    let scale = match scale {
        Some(dx) if dx.is_finite() && dx > 0.0 => dx,
        _ => normalize_scale(reference.scale),
    };
    let dims = reference.data.dim();
    let cf = InterpolatedImage::new(
        reference.data,
        scale,
        Interpolant::default(),
        Normalization::SurfaceBrightness,
    )?;

    let mut noise = CorrelatedNoise::from_profile(Profile::interpolated(cf), rng);
    if variance > 0.0 {
        noise.set_variance(variance)?;
    }

    info!(
        "Loaded {:?} reference correlation function from {} (scale {}, variance {:.4e})",
        dims,
        path.display(),
        scale,
        noise.variance()
    );
    Ok(noise)
}

/// Write the correlation function sampled in `image` to `path`.
pub fn save_reference_correlation(
    path: impl AsRef<Path>,
    image: &Image,
) -> Result<(), CorrelatedNoiseError> {
    ReferenceCorrelation::from_image(image).save_to_file(path.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;
    use tempfile::tempdir;

    fn reference() -> ReferenceCorrelation {
        ReferenceCorrelation {
            scale: 0.03,
            data: array![[0.1, 0.2, 0.1], [0.2, 2.0, 0.2], [0.1, 0.2, 0.1]],
        }
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cf.json");
        reference().save_to_file(&path).unwrap();

        let loaded = ReferenceCorrelation::load_from_file(&path).unwrap();
        assert_eq!(loaded, reference());

        let noise = load_reference_noise(&path, GaussianDeviate::new(1), None, 0.0).unwrap();
        assert_relative_eq!(noise.variance(), 2.0);
    }

    #[test]
    fn test_variance_and_scale_override() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cf.json");
        reference().save_to_file(&path).unwrap();

        let noise = load_reference_noise(&path, GaussianDeviate::new(1), Some(1.0), 0.5).unwrap();
        assert_relative_eq!(noise.variance(), 0.5, epsilon = 1e-12);
        // One pixel at the overridden scale reaches the neighbouring sample
        let neighbour = noise
            .profile()
            .x_value(crate::profile::Position::new(1.0, 0.0));
        assert_relative_eq!(neighbour, 0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_negative_variance_checked_first() {
        let err = load_reference_noise(
            "/nonexistent/cf.json",
            GaussianDeviate::new(1),
            None,
            -1.0,
        )
        .unwrap_err();
        assert!(matches!(err, CorrelatedNoiseError::NegativeVariance(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = load_reference_noise(
            dir.path().join("missing.json"),
            GaussianDeviate::new(1),
            None,
            0.0,
        )
        .unwrap_err();
        assert!(matches!(err, CorrelatedNoiseError::Io { .. }));
    }

    #[test]
    fn test_malformed_file_is_format_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_reference_noise(&path, GaussianDeviate::new(1), None, 0.0).unwrap_err();
        assert!(matches!(err, CorrelatedNoiseError::Format { .. }));
    }

    #[test]
    fn test_even_array_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("even.json");
        ReferenceCorrelation {
            scale: 1.0,
            data: Array2::ones((4, 5)),
        }
        .save_to_file(&path)
        .unwrap();

        let err = load_reference_noise(&path, GaussianDeviate::new(1), None, 0.0).unwrap_err();
        assert!(matches!(
            err,
            CorrelatedNoiseError::InvalidCorrelationArray { rows: 4, cols: 5 }
        ));
    }

    #[test]
    fn test_save_reference_correlation_from_drawn_image() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("drawn.json");

        let noise = load_reference_noise_from(reference());
        let mut image = Image::with_size(5, 5, 0.03);
        noise.draw(&mut image, None, false).unwrap();
        save_reference_correlation(&path, &image).unwrap();

        let loaded = ReferenceCorrelation::load_from_file(&path).unwrap();
        assert_eq!(loaded.data.dim(), (5, 5));
        assert_relative_eq!(loaded.data[[2, 2]], 2.0);
        assert_relative_eq!(loaded.scale, 0.03);
    }

    fn load_reference_noise_from(reference: ReferenceCorrelation) -> CorrelatedNoise {
        let cf = InterpolatedImage::new(
            reference.data,
            reference.scale,
            Interpolant::default(),
            Normalization::SurfaceBrightness,
        )
        .unwrap();
        CorrelatedNoise::from_profile(Profile::interpolated(cf), GaussianDeviate::new(1))
    }
}
