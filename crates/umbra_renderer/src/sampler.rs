//! Uniform random number sources for the estimators.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use umbra_math::Vec2;

/// Source of uniform samples in `[0, 1)`.
///
/// Samplers are stateful and meant to be owned by a single worker; the
/// scene itself is shared read-only.
pub trait Sampler {
    /// One uniform value in `[0, 1)`.
    fn get_1d(&mut self) -> f32;

    /// Two independent uniform values in `[0, 1)`.
    fn get_2d(&mut self) -> Vec2 {
        let x = self.get_1d();
        let y = self.get_1d();
        Vec2::new(x, y)
    }
}

/// Independent uniform samples drawn from a seedable PRNG.
#[derive(Debug, Clone)]
pub struct RandomSampler {
    rng: StdRng,
}

impl RandomSampler {
    /// Deterministic sampler for a given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Sampler for RandomSampler {
    #[inline]
    fn get_1d(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }
}

/// Derive a per-worker seed from a base seed and a worker index.
///
/// SplitMix64 finalizer, so neighbouring indices give unrelated streams.
pub fn stream_seed(seed: u64, index: u64) -> u64 {
    let mut z = seed ^ index.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
