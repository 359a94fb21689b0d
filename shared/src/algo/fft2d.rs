//! Two-dimensional discrete Fourier transforms on ndarray grids.
//!
//! Thin row/column wrappers over `rustfft` with the same conventions as the
//! usual numerical-array libraries:
//!
//! - forward transform is unnormalized,
//! - inverse transform divides by the total number of elements,
//! - zero frequency sits at index `[0, 0]`.
//!
//! Arrays are indexed `[row, col]` (i.e. `[y, x]`).

use ndarray::{Array2, Axis};
use rayon::prelude::*;
use rustfft::num_complex::Complex64;
use rustfft::{Fft, FftDirection, FftPlanner};
use std::sync::Arc;

/// Apply one planned 1D transform along every lane of the given axis.
///
/// Lanes are transformed in parallel; each rayon job reuses one copy buffer
/// and one scratch buffer.
fn transform_axis(data: &mut Array2<Complex64>, axis: Axis, fft: &Arc<dyn Fft<f64>>) {
    let len = data.len_of(axis);
    let scratch_len = fft.get_inplace_scratch_len();
    // Lanes along `axis` are the subviews taken across the other axis
    let across = Axis(1 - axis.index());

    data.axis_iter_mut(across).into_par_iter().for_each_init(
        || {
            (
                vec![Complex64::new(0.0, 0.0); len],
                vec![Complex64::new(0.0, 0.0); scratch_len],
            )
        },
        |(buffer, scratch), mut lane| {
            for (dst, src) in buffer.iter_mut().zip(lane.iter()) {
                *dst = *src;
            }
            fft.process_with_scratch(buffer, scratch);
            for (dst, src) in lane.iter_mut().zip(buffer.iter()) {
                *dst = *src;
            }
        },
    );
}

fn transform_2d(data: &mut Array2<Complex64>, direction: FftDirection) {
    let (rows, cols) = data.dim();
    if rows == 0 || cols == 0 {
        return;
    }

    let mut planner = FftPlanner::new();
    let row_fft = planner.plan_fft(cols, direction);
    let col_fft = planner.plan_fft(rows, direction);

    // Lanes along Axis(1) are rows; along Axis(0) are columns
    transform_axis(data, Axis(1), &row_fft);
    transform_axis(data, Axis(0), &col_fft);
}

/// Forward 2D FFT of a complex array (unnormalized).
pub fn fft2(input: &Array2<Complex64>) -> Array2<Complex64> {
    let mut data = input.clone();
    transform_2d(&mut data, FftDirection::Forward);
    data
}

/// Forward 2D FFT of a real array.
pub fn fft2_real(input: &Array2<f64>) -> Array2<Complex64> {
    let mut data = input.mapv(|v| Complex64::new(v, 0.0));
    transform_2d(&mut data, FftDirection::Forward);
    data
}

/// Inverse 2D FFT, normalized by `1 / (rows * cols)`.
pub fn ifft2(input: &Array2<Complex64>) -> Array2<Complex64> {
    let mut data = input.clone();
    transform_2d(&mut data, FftDirection::Inverse);

    let n = data.len();
    if n > 0 {
        let norm = 1.0 / n as f64;
        data.mapv_inplace(|v| v * norm);
    }
    data
}

/// Cyclically shift an array by `(row_shift, col_shift)`.
///
/// Element `[i, j]` of the input lands at
/// `[(i + row_shift) % rows, (j + col_shift) % cols]`.
pub fn roll2d<T: Clone>(input: &Array2<T>, shift: (usize, usize)) -> Array2<T> {
    let (rows, cols) = input.dim();
    if rows == 0 || cols == 0 {
        return input.clone();
    }

    let (dr, dc) = (shift.0 % rows, shift.1 % cols);
    Array2::from_shape_fn((rows, cols), |(i, j)| {
        input[[(i + rows - dr) % rows, (j + cols - dc) % cols]].clone()
    })
}
