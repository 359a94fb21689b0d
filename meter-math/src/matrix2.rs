//! 2x2 matrix utilities using nalgebra
//!
//! Builders for the linear part of image-plane transforms (rotation,
//! anisotropic scaling, reduced shear) plus inversion with an explicit
//! error for singular matrices.

use nalgebra::Matrix2;
use thiserror::Error;

/// Error when matrix inversion fails due to singular matrix
#[derive(Error, Debug, Clone, PartialEq)]
#[error("singular matrix: determinant={determinant:.6e}")]
pub struct SingularMatrixError {
    /// The determinant value (zero or near-zero)
    pub determinant: f64,
}

/// Threshold for considering a determinant as zero
const DETERMINANT_EPSILON: f64 = 1e-10;

/// Invert a 2x2 matrix with error handling for singular matrices
///
/// # Arguments
/// * `matrix` - The 2x2 matrix to invert
///
/// # Returns
/// * `Ok(Matrix2<f64>)` - The inverse matrix
/// * `Err(SingularMatrixError)` - If matrix is singular
pub fn invert_matrix(matrix: &Matrix2<f64>) -> Result<Matrix2<f64>, SingularMatrixError> {
    let det = matrix.determinant();

    if det.abs() < DETERMINANT_EPSILON {
        return Err(SingularMatrixError { determinant: det });
    }

    matrix
        .try_inverse()
        .ok_or(SingularMatrixError { determinant: det })
}

/// Create a 2x2 rotation matrix
///
/// # Arguments
/// * `angle_rad` - Rotation angle in radians (counter-clockwise)
pub fn rotation_matrix(angle_rad: f64) -> Matrix2<f64> {
    let c = angle_rad.cos();
    let s = angle_rad.sin();
    Matrix2::new(c, -s, s, c)
}

/// Create a 2x2 scaling matrix
pub fn scale_matrix(sx: f64, sy: f64) -> Matrix2<f64> {
    Matrix2::new(sx, 0.0, 0.0, sy)
}

/// Area-preserving distortion matrix for a reduced shear `(g1, g2)`.
///
/// ```text
/// S = [[1 + g1, g2], [g2, 1 - g1]] / sqrt(1 - g1² - g2²)
/// ```
///
/// The determinant is exactly one, so applying `S` stretches a circle into
/// an ellipse with axis ratio `(1 - |g|) / (1 + |g|)` without changing its
/// area. Callers must ensure `|g| < 1`.
pub fn shear_matrix(g1: f64, g2: f64) -> Matrix2<f64> {
    let norm = 1.0 / (1.0 - g1 * g1 - g2 * g2).sqrt();
    Matrix2::new(1.0 + g1, g2, g2, 1.0 - g1) * norm
}
