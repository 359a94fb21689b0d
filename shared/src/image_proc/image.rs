//! Pixel images with bounds and a pixel scale.
//!
//! [`Image`] pairs an `Array2<f64>` pixel buffer (indexed `[row, col]`, i.e.
//! `[y, x]`) with integer [`Bounds`] and a pixel scale in world units per
//! pixel. A nonpositive (or non-finite) scale means "unset" and is read as
//! 1.0 by [`Image::effective_scale`].

use super::bounds::Bounds;
use ndarray::{Array2, ArrayViewMut2};
use thiserror::Error;

/// Errors raised by image arithmetic
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImageError {
    #[error("array shape {found:?} does not match image shape {expected:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
}

/// Normalize a pixel scale: nonpositive or non-finite scales become 1.0.
pub fn normalize_scale(scale: f64) -> f64 {
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    }
}

/// 2D real-valued image with bounds and pixel scale
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    array: Array2<f64>,
    bounds: Bounds,
    scale: f64,
}

impl Image {
    /// Zero-filled image covering `bounds`.
    pub fn new(bounds: Bounds, scale: f64) -> Self {
        Self {
            array: Array2::zeros(bounds.shape()),
            bounds,
            scale,
        }
    }

    /// Zero-filled image of `cols x rows` pixels with bounds starting at (1, 1).
    pub fn with_size(cols: usize, rows: usize, scale: f64) -> Self {
        Self::new(Bounds::with_size(cols, rows), scale)
    }

    /// Wrap an existing pixel array; bounds start at (1, 1).
    pub fn from_array(array: Array2<f64>, scale: f64) -> Self {
        let (rows, cols) = array.dim();
        Self {
            array,
            bounds: Bounds::with_size(cols, rows),
            scale,
        }
    }

    /// Convert integer or single-precision sensor data into an image.
    pub fn from_pixels<T>(pixels: &Array2<T>, scale: f64) -> Self
    where
        T: Copy + Into<f64>,
    {
        Self::from_array(pixels.mapv(Into::into), scale)
    }

    /// An image with no pixel grid.
    pub fn undefined() -> Self {
        Self::new(Bounds::undefined(), 0.0)
    }

    pub fn array(&self) -> &Array2<f64> {
        &self.array
    }

    /// Mutable view of the pixels; the shape stays tied to the bounds.
    pub fn array_mut(&mut self) -> ArrayViewMut2<'_, f64> {
        self.array.view_mut()
    }

    pub fn into_array(self) -> Array2<f64> {
        self.array
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Pixel array shape `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        self.array.dim()
    }

    /// Raw pixel scale as stored (may be unset)
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    /// Pixel scale with "unset" normalized to 1.0
    pub fn effective_scale(&self) -> f64 {
        normalize_scale(self.scale)
    }

    /// Add an image-shaped array into this image's pixels.
    pub fn add_array(&mut self, other: &Array2<f64>) -> Result<(), ImageError> {
        if other.dim() != self.array.dim() {
            return Err(ImageError::ShapeMismatch {
                expected: self.array.dim(),
                found: other.dim(),
            });
        }
        self.array += other;
        Ok(())
    }

    pub fn fill(&mut self, value: f64) {
        self.array.fill(value);
    }
}
