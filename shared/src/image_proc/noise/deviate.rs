//! Shared Gaussian deviate stream.
//!
//! A [`GaussianDeviate`] is a handle onto a single seeded random stream.
//! Cloning the handle shares the stream: two clones interleave their draws
//! from the same sequence. [`GaussianDeviate::duplicate`] instead forks an
//! independent stream that starts from the current state.
//!
//! Draws are serialized by an internal mutex, so sampling from several
//! threads is memory-safe, but the interleaving (and therefore which thread
//! sees which deviates) is not deterministic. Callers that need
//! reproducible fields must serialize their sampling externally.

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use std::sync::{Arc, Mutex, MutexGuard};

/// Handle onto a shared standard-normal random stream
#[derive(Debug, Clone)]
pub struct GaussianDeviate {
    rng: Arc<Mutex<StdRng>>,
}

impl GaussianDeviate {
    /// Create a new stream from a fixed seed.
    pub fn new(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    /// Create a new stream seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StdRng> {
        // A panic while holding the lock cannot leave StdRng in an invalid state
        self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Draw a single standard-normal deviate.
    pub fn sample(&self) -> f64 {
        StandardNormal.sample(&mut *self.lock())
    }

    /// Fill an array of the given `(rows, cols)` shape with independent
    /// standard-normal deviates, drawn in row-major order.
    pub fn fill(&self, shape: (usize, usize)) -> Array2<f64> {
        let mut rng = self.lock();
        Array2::from_shape_simple_fn(shape, || StandardNormal.sample(&mut *rng))
    }

    /// Fork an independent stream whose future draws equal this stream's
    /// next draws, without advancing or sharing this stream.
    pub fn duplicate(&self) -> Self {
        Self::from_rng(self.lock().clone())
    }

    /// Whether two handles draw from the same underlying stream.
    pub fn shares_stream_with(&self, other: &GaussianDeviate) -> bool {
        Arc::ptr_eq(&self.rng, &other.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_same_seed_same_sequence() {
        let a = GaussianDeviate::new(42);
        let b = GaussianDeviate::new(42);
        assert_eq!(a.fill((4, 4)), b.fill((4, 4)));
        assert!(!a.shares_stream_with(&b));
    }

    #[test]
    fn test_clone_shares_stream() {
        let a = GaussianDeviate::new(7);
        let reference = GaussianDeviate::new(7);
        let b = a.clone();
        assert!(a.shares_stream_with(&b));

        // Draws interleave on one sequence
        let first = a.sample();
        let second = b.sample();
        assert_eq!(first, reference.sample());
        assert_eq!(second, reference.sample());
    }

    #[test]
    fn test_duplicate_is_independent_copy() {
        let a = GaussianDeviate::new(11);
        a.sample();
        let b = a.duplicate();
        assert!(!a.shares_stream_with(&b));

        // Same state, separate streams
        assert_eq!(a.sample(), b.sample());
        b.sample();
        let c = a.duplicate();
        assert_eq!(a.sample(), c.sample());
    }

    #[test]
    fn test_fill_statistics() {
        let deviate = GaussianDeviate::new(123);
        let field = deviate.fill((200, 200));
        assert_eq!(field.dim(), (200, 200));

        let mean = field.mean().unwrap();
        let std = field.std(0.0);
        assert_relative_eq!(mean, 0.0, epsilon = 0.02);
        assert_relative_eq!(std, 1.0, epsilon = 0.02);
    }
}
