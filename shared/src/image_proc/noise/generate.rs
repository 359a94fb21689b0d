//! Noise generation utilities for test and validation images.
//!
//! Provides deterministic white-noise fields used as sample images when
//! estimating noise correlation functions, and as reference inputs in
//! tests that need reproducible pixel statistics.

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal, NormalError};

/// Generate a 2D array of normally distributed values for testing purposes.
///
/// This function creates a deterministic array filled with values sampled from
/// a normal (Gaussian) distribution. It's specifically designed for unit tests
/// and simulation validation where reproducible noise patterns are needed.
///
/// # Arguments
/// * `size` - Tuple of (height, width) for the output array dimensions
/// * `mean` - Mean value of the normal distribution
/// * `std_dev` - Standard deviation of the normal distribution
/// * `seed` - Random seed for deterministic output
///
/// # Returns
/// A 2D array with values sampled from Normal(mean, std_dev), or an error
/// when `std_dev` is negative or non-finite.
pub fn simple_normal_array(
    size: (usize, usize),
    mean: f64,
    std_dev: f64,
    seed: u64,
) -> Result<Array2<f64>, NormalError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal_dist = Normal::new(mean, std_dev)?;
    Ok(Array2::from_shape_fn(size, |_| normal_dist.sample(&mut rng)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_simple_normal_array_statistics() {
        let noise = simple_normal_array((100, 100), 50.0, 5.0, 123).unwrap();
        assert_eq!(noise.dim(), (100, 100));

        assert_relative_eq!(noise.mean().unwrap(), 50.0, epsilon = 0.5);
        assert_relative_eq!(noise.std(0.0), 5.0, epsilon = 0.5);
    }

    #[test]
    fn test_deterministic_output() {
        let noise1 = simple_normal_array((5, 5), 0.0, 1.0, 42).unwrap();
        let noise2 = simple_normal_array((5, 5), 0.0, 1.0, 42).unwrap();
        assert_eq!(noise1, noise2);
    }

    #[test]
    fn test_invalid_std_dev() {
        assert!(simple_normal_array((2, 2), 0.0, f64::NAN, 1).is_err());
    }
}
