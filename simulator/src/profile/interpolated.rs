//! Surface-brightness profile defined by a sampled grid.
//!
//! The grid's centre pixel `(rows / 2, cols / 2)` sits at the profile
//! origin and pixel `[i, j]` covers position
//! `((j - cols/2) * scale, (i - rows/2) * scale)`. Between samples the value
//! is reconstructed with a separable [`Interpolant`]; beyond the grid the
//! profile is zero.

use super::interpolant::Interpolant;
use super::{Normalization, Position, ProfileError, SurfaceBrightness};
use ndarray::Array2;

/// Gridded profile with separable kernel interpolation
#[derive(Debug, Clone)]
pub struct InterpolatedImage {
    /// Surface-brightness samples indexed `[row, col]`
    data: Array2<f64>,
    scale: f64,
    interpolant: Interpolant,
    center: (f64, f64),
}

impl InterpolatedImage {
    /// Build a profile from gridded samples.
    ///
    /// With [`Normalization::SurfaceBrightness`] the samples are taken as
    /// literal surface-brightness values. With [`Normalization::Flux`] they
    /// are per-pixel fluxes and are divided by the pixel area `scale²`.
    ///
    /// # Errors
    /// `EmptyData` for a zero-sized grid, `InvalidScale` for a nonpositive
    /// or non-finite scale.
    pub fn new(
        data: Array2<f64>,
        scale: f64,
        interpolant: Interpolant,
        normalization: Normalization,
    ) -> Result<Self, ProfileError> {
        let (rows, cols) = data.dim();
        if rows == 0 || cols == 0 {
            return Err(ProfileError::EmptyData);
        }
        if !(scale.is_finite() && scale > 0.0) {
            return Err(ProfileError::InvalidScale(scale));
        }

        let data = match normalization {
            Normalization::SurfaceBrightness => data,
            Normalization::Flux => data / (scale * scale),
        };

        Ok(Self {
            data,
            scale,
            interpolant,
            center: ((cols / 2) as f64, (rows / 2) as f64),
        })
    }

    /// Surface-brightness samples
    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn interpolant(&self) -> Interpolant {
        self.interpolant
    }

    /// Kernel taps along one axis: `(index, weight)` pairs for grid
    /// coordinate `u` on an axis of length `len`.
    fn taps(&self, u: f64, len: usize) -> Vec<(usize, f64)> {
        let range = self.interpolant.x_range();
        let lo = (u - range).ceil().max(0.0);
        let hi = (u + range).floor().min(len as f64 - 1.0);
        if lo > hi {
            return Vec::new();
        }

        (lo as usize..=hi as usize)
            .filter_map(|k| {
                let w = self.interpolant.x_value(u - k as f64);
                (w != 0.0).then_some((k, w))
            })
            .collect()
    }
}

impl SurfaceBrightness for InterpolatedImage {
    fn x_value(&self, pos: Position) -> f64 {
        let (rows, cols) = self.data.dim();
        let u = pos.x / self.scale + self.center.0;
        let v = pos.y / self.scale + self.center.1;

        let x_taps = self.taps(u, cols);
        if x_taps.is_empty() {
            return 0.0;
        }

        self.taps(v, rows)
            .into_iter()
            .map(|(i, wy)| {
                let row_sum: f64 = x_taps
                    .iter()
                    .map(|&(j, wx)| self.data[[i, j]] * wx)
                    .sum();
                row_sum * wy
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn ramp() -> InterpolatedImage {
        let data = array![[0.0, 1.0, 2.0], [3.0, 4.0, 5.0], [6.0, 7.0, 8.0]];
        InterpolatedImage::new(
            data,
            0.5,
            Interpolant::default(),
            Normalization::SurfaceBrightness,
        )
        .unwrap()
    }

    #[test]
    fn test_centre_sample_at_origin() {
        let image = ramp();
        assert_relative_eq!(image.x_value(Position::new(0.0, 0.0)), 4.0);
        // One pixel right, one pixel up (in array rows)
        assert_relative_eq!(image.x_value(Position::new(0.5, 0.0)), 5.0);
        assert_relative_eq!(image.x_value(Position::new(0.0, 0.5)), 7.0);
        assert_relative_eq!(image.x_value(Position::new(-0.5, -0.5)), 0.0);
    }

    #[test]
    fn test_bilinear_between_samples() {
        let image = ramp();
        // Halfway between 4 and 5
        assert_relative_eq!(image.x_value(Position::new(0.25, 0.0)), 4.5);
        // Centre of the 4,5,7,8 cell
        assert_relative_eq!(image.x_value(Position::new(0.25, 0.25)), 6.0);
    }

    #[test]
    fn test_zero_outside_grid() {
        let image = ramp();
        assert_eq!(image.x_value(Position::new(10.0, 0.0)), 0.0);
        assert_eq!(image.x_value(Position::new(0.0, -10.0)), 0.0);
        // Half a pixel past the edge fades linearly towards zero
        assert_relative_eq!(image.x_value(Position::new(0.75, 0.0)), 2.5);
    }

    #[test]
    fn test_flux_normalization() {
        let data = array![[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]];
        let image =
            InterpolatedImage::new(data, 0.5, Interpolant::default(), Normalization::Flux)
                .unwrap();
        assert_relative_eq!(image.x_value(Position::new(0.0, 0.0)), 4.0);
    }

    #[test]
    fn test_rejects_bad_input() {
        let err = InterpolatedImage::new(
            Array2::zeros((0, 3)),
            1.0,
            Interpolant::default(),
            Normalization::Flux,
        )
        .unwrap_err();
        assert!(matches!(err, ProfileError::EmptyData));

        let err = InterpolatedImage::new(
            Array2::zeros((3, 3)),
            0.0,
            Interpolant::default(),
            Normalization::Flux,
        )
        .unwrap_err();
        assert!(matches!(err, ProfileError::InvalidScale(_)));
    }
}
