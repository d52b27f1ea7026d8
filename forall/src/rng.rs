//! Seeded random source shared by every generator of a run.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic random cursor handed to sampling functions.
///
/// A `Random` is created from a 64-bit seed and yields the same draws for
/// the same seed on every platform. It implements [`RngCore`], so sampling
/// functions can use any [`rand::Rng`] method on it:
///
/// ```rust
/// use forall::Random;
/// use rand::Rng;
///
/// let mut a = Random::from_seed(7);
/// let mut b = Random::from_seed(7);
/// assert_eq!(a.gen_range(0..100), b.gen_range(0..100));
/// ```
///
/// Combined generators draw from one shared `Random`, once per component
/// and in declared order, so the master seed alone determines every value.
#[derive(Debug, Clone)]
pub struct Random {
    seed: u64,
    inner: ChaCha8Rng,
}

impl Random {
    /// Create a cursor positioned at the start of the sequence for `seed`
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Seed this cursor was created from
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RngCore for Random {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}

/// Draw a fresh seed from the process entropy source.
///
/// Used when a run is started without an explicit seed. The drawn seed is
/// reported with any failure so the run can be replayed.
pub fn fresh_seed() -> u64 {
    rand::thread_rng().r#gen()
}
