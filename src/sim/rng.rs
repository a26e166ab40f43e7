//! Seeded random source shared by every actor
//!
//! One generator is created per playground and handed to each actor's
//! `advance`, so a run is reproducible from its seed.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

#[derive(Debug, Clone)]
pub struct SimRng {
    seed: u64,
    inner: Pcg32,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            inner: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform float in [0, 1)
    #[inline]
    pub fn unit(&mut self) -> f32 {
        self.inner.random::<f32>()
    }

    /// Uniform float between `min` and `max`; inverted bounds are allowed
    #[inline]
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.unit() * (max - min)
    }

    /// Uniform integer in [0, n), zero when `n` is zero
    #[inline]
    pub fn below(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        self.inner.random_range(0..n)
    }

    /// `base` plus a uniform integer in [0, spread)
    #[inline]
    pub fn ticks(&mut self, base: u32, spread: u32) -> u32 {
        base + self.below(spread)
    }

    /// Uniform integer in [lo, hi], `lo` when the range is empty
    #[inline]
    pub fn between(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        lo + self.below((hi - lo + 1) as u32) as i32
    }

    #[inline]
    pub fn chance(&mut self, p: f32) -> bool {
        self.unit() < p
    }

    /// +1.0 or -1.0 with equal odds
    #[inline]
    pub fn sign(&mut self) -> f32 {
        if self.below(2) == 0 { -1.0 } else { 1.0 }
    }

    /// Random element of a non-empty palette
    pub fn pick<T: Copy + Default>(&mut self, items: &[T]) -> T {
        if items.is_empty() {
            return T::default();
        }
        items[self.below(items.len() as u32) as usize]
    }
}
