//! Cache of root power spectra keyed by image shape and pixel scale.
//!
//! Entries are appended on first use and never evicted individually. The
//! owning [`CorrelatedNoise`](super::CorrelatedNoise) clears the whole cache
//! whenever it replaces its correlation-function profile.

use log::debug;
use ndarray::Array2;
use shared::image_proc::normalize_scale;

/// Square root of a noise power spectrum sampled on one pixel grid
#[derive(Debug, Clone, PartialEq)]
pub struct RootSpectrum {
    array: Array2<f64>,
    scale: f64,
}

impl RootSpectrum {
    pub fn array(&self) -> &Array2<f64> {
        &self.array
    }

    /// Pixel scale the spectrum was computed at (always positive)
    pub fn scale(&self) -> f64 {
        self.scale
    }

    fn matches(&self, shape: (usize, usize), scale: f64) -> bool {
        self.array.dim() == shape && self.scale == scale
    }
}

/// Per-instance root power spectrum cache
#[derive(Debug, Clone, Default)]
pub struct SpectralCache {
    entries: Vec<RootSpectrum>,
}

impl SpectralCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, shape: (usize, usize), scale: f64) -> Option<usize> {
        let scale = normalize_scale(scale);
        self.entries.iter().position(|entry| entry.matches(shape, scale))
    }

    /// Root spectrum for an image of `shape` at pixel scale `scale`.
    ///
    /// Unset scales (nonpositive or non-finite) match entries stored at 1.0.
    pub fn lookup(&self, shape: (usize, usize), scale: f64) -> Option<&Array2<f64>> {
        self.position(shape, scale)
            .map(|index| &self.entries[index].array)
    }

    /// Append a root spectrum computed at `scale`.
    pub fn store(&mut self, array: Array2<f64>, scale: f64) {
        self.entries.push(RootSpectrum {
            array,
            scale: normalize_scale(scale),
        });
    }

    /// Return the cached spectrum for `(shape, scale)`, computing and storing
    /// it with `compute` on a miss.
    pub fn get_or_try_insert_with<E, F>(
        &mut self,
        shape: (usize, usize),
        scale: f64,
        compute: F,
    ) -> Result<&Array2<f64>, E>
    where
        F: FnOnce() -> Result<Array2<f64>, E>,
    {
        let index = match self.position(shape, scale) {
            Some(index) => {
                debug!("Spectral cache hit for {:?} at scale {}", shape, scale);
                index
            }
            None => {
                debug!("Spectral cache miss for {:?} at scale {}", shape, scale);
                let array = compute()?;
                self.store(array, scale);
                self.entries.len() - 1
            }
        };
        Ok(&self.entries[index].array)
    }

    /// Drop every entry.
    pub fn invalidate(&mut self) {
        if !self.entries.is_empty() {
            debug!("Invalidating {} spectral cache entries", self.entries.len());
        }
        self.entries.clear();
    }

    /// Multiply every stored root spectrum by `factor`.
    pub fn rescale(&mut self, factor: f64) {
        for entry in &mut self.entries {
            entry.array *= factor;
        }
    }

    pub fn entries(&self) -> &[RootSpectrum] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_matches_shape_and_scale() {
        let mut cache = SpectralCache::new();
        cache.store(Array2::ones((4, 4)), 0.2);
        cache.store(Array2::zeros((4, 4)), 0.5);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.lookup((4, 4), 0.2), Some(&Array2::ones((4, 4))));
        assert_eq!(cache.lookup((4, 4), 0.5), Some(&Array2::zeros((4, 4))));
        assert!(cache.lookup((4, 5), 0.2).is_none());
        assert!(cache.lookup((4, 4), 0.3).is_none());
    }

    #[test]
    fn test_unset_scale_matches_unit_scale() {
        let mut cache = SpectralCache::new();
        cache.store(Array2::ones((2, 2)), 0.0);
        assert_eq!(cache.entries()[0].scale(), 1.0);
        assert!(cache.lookup((2, 2), 1.0).is_some());
        assert!(cache.lookup((2, 2), -4.0).is_some());
        assert!(cache.lookup((2, 2), f64::NAN).is_some());
    }

    #[test]
    fn test_get_or_try_insert_with_computes_once() {
        let mut cache = SpectralCache::new();
        let mut calls = 0;

        for _ in 0..3 {
            let root = cache
                .get_or_try_insert_with((3, 3), 1.0, || {
                    calls += 1;
                    Ok::<_, ()>(Array2::from_elem((3, 3), 2.0))
                })
                .unwrap();
            assert_eq!(root[[1, 1]], 2.0);
        }
        assert_eq!(calls, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_failed_compute_stores_nothing() {
        let mut cache = SpectralCache::new();
        let result = cache.get_or_try_insert_with((3, 3), 1.0, || Err("boom"));
        assert_eq!(result, Err("boom"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalidate_and_rescale() {
        let mut cache = SpectralCache::new();
        cache.store(Array2::from_elem((2, 2), 3.0), 1.0);
        cache.rescale(2.0);
        assert_eq!(cache.lookup((2, 2), 1.0), Some(&Array2::from_elem((2, 2), 6.0)));

        cache.invalidate();
        assert!(cache.is_empty());
        assert!(cache.lookup((2, 2), 1.0).is_none());
    }
}
