//! Core trait definitions.
//!
//! Topic draws and phrase selection are the only non-deterministic steps in
//! the engine. They go through `RandomSource` so hosts can pin them.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ---------------------------------------------------------------------------
// Random source trait
// ---------------------------------------------------------------------------

/// A source of uniform choices.
pub trait RandomSource {
    /// Return an index in `0..len`. Callers never pass `len == 0`.
    fn pick(&mut self, len: usize) -> usize;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn pick(&mut self, len: usize) -> usize {
        (**self).pick(len)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn pick(&mut self, len: usize) -> usize {
        (**self).pick(len)
    }
}

/// Pick one element of `items`, or `None` when the slice is empty.
///
/// An out-of-range index from a misbehaving source falls back to the first
/// element.
pub fn choose<'a, T, R: RandomSource + ?Sized>(rng: &mut R, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    let index = rng.pick(items.len());
    items.get(index).or_else(|| items.first())
}

// ---------------------------------------------------------------------------
// Implementations
// ---------------------------------------------------------------------------

/// `StdRng`-backed source, seeded from the OS or from a fixed seed.
#[derive(Debug, Clone)]
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    /// Seed from operating-system entropy.
    pub fn from_os() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for StdRandom {
    fn default() -> Self {
        Self::from_os()
    }
}

impl RandomSource for StdRandom {
    fn pick(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.rng.random_range(0..len)
    }
}

/// Always picks the same position (modulo the slice length).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedRandom(pub usize);

impl RandomSource for FixedRandom {
    fn pick(&mut self, len: usize) -> usize {
        if len == 0 {
            0
        } else {
            self.0 % len
        }
    }
}
