//! Explicit pixel covariance matrices.
//!
//! For an image of `P` pixels the covariance matrix is `P x P`, so building
//! it for an `N x N` image touches `N⁴` entries and any factorization of it
//! costs `O(N⁶)`. This is for validating small cases only; noise synthesis
//! goes through the spectral route.

use super::CorrelatedNoiseError;
use crate::profile::{Position, Profile};
use ndarray::{Array2, Axis};
use rayon::prelude::*;
use shared::image_proc::{normalize_scale, Bounds};

/// Covariance matrix of the pixels inside `bounds` at pixel scale `dx`.
///
/// Pixels are ordered row-major (y outer, x inner). Entry `[i, j]` for
/// `j >= i` is the correlation function evaluated at the separation of
/// pixel `j` from pixel `i`; the lower triangle is left zero. A
/// nonpositive `dx` means unit scale.
///
/// # Errors
/// `UndefinedBounds` if `bounds` is not defined.
pub fn covariance_matrix(
    profile: &Profile,
    bounds: Bounds,
    dx: f64,
) -> Result<Array2<f64>, CorrelatedNoiseError> {
    if !bounds.is_defined() {
        return Err(CorrelatedNoiseError::UndefinedBounds);
    }

    let dx = normalize_scale(dx);
    let positions: Vec<(i64, i64)> = bounds.iter_positions().collect();
    let npix = positions.len();
    let mut matrix = Array2::<f64>::zeros((npix, npix));

    matrix
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(i, mut row)| {
            let (xi, yi) = positions[i];
            for (j, &(xj, yj)) in positions.iter().enumerate().skip(i) {
                let separation =
                    Position::new(offset(xi, xj) as f64 * dx, offset(yi, yj) as f64 * dx);
                row[j] = profile.x_value(separation);
            }
        });

    Ok(matrix)
}

/// Signed pixel offset `to - from` without i64 overflow.
fn offset(from: i64, to: i64) -> i128 {
    i128::from(to) - i128::from(from)
}
