//! Move selection policy: a uniform pick from a candidate list.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Source of uniform indices. Every `rand::Rng` is one.
pub trait RandomSource {
    /// Uniform index in `0..len`. `len` must be non-zero.
    fn pick(&mut self, len: usize) -> usize;
}

impl<R: Rng> RandomSource for R {
    #[inline]
    fn pick(&mut self, len: usize) -> usize {
        self.random_range(0..len)
    }
}

/// Uniformly chosen element, `None` for an empty slice.
pub fn choose<'a, T, R>(rng: &mut R, items: &'a [T]) -> Option<&'a T>
where
    R: RandomSource + ?Sized,
{
    if items.is_empty() {
        None
    } else {
        items.get(rng.pick(items.len()))
    }
}

/// One generator per mover. A seed makes the pair reproducible.
pub fn mover_rngs(seed: Option<u64>) -> [StdRng; 2] {
    let mut master = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => {
            let mut bytes = [0u8; 32];
            rand::rng().fill_bytes(&mut bytes);
            StdRng::from_seed(bytes)
        }
    };
    let white = StdRng::seed_from_u64(master.next_u64());
    let black = StdRng::seed_from_u64(master.next_u64());
    [white, black]
}
