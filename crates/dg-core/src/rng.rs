//! Random number generation for dungeon generation
//!
//! Uses a seeded ChaCha RNG so that a seed always replays the same dungeon.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Dungeon random number generator
///
/// Wraps ChaCha8Rng. All draws are made in the `u32` domain so the sequence
/// does not depend on the platform's pointer width.
#[derive(Debug, Clone)]
pub struct DungeonRng {
    rng: ChaCha8Rng,
    seed: u64,
    draws: u64,
}

// Only the seed is serialized; the stream restarts from it on deserialize
impl Serialize for DungeonRng {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.seed.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DungeonRng {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let seed = u64::deserialize(deserializer)?;
        Ok(DungeonRng::new(seed))
    }
}

impl DungeonRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            draws: 0,
        }
    }

    /// Get the seed used to create this RNG
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of values drawn so far
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Returns 0..n-1
    ///
    /// Returns 0 if n is 0.
    pub fn below(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        self.draws += 1;
        self.rng.gen_range(0..n)
    }

    /// Returns lo..=hi, or `lo` when the range is empty
    pub fn between(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        self.draws += 1;
        self.rng.gen_range(lo..=hi)
    }

    /// Returns lo..=hi for grid coordinates
    pub fn between_u8(&mut self, lo: u8, hi: u8) -> u8 {
        self.between(u32::from(lo), u32::from(hi)) as u8
    }

    /// Fair coin flip
    pub fn coin(&mut self) -> bool {
        self.below(2) == 0
    }

    /// Raw 64-bit value, used to derive seeds for retry attempts
    pub fn next_seed(&mut self) -> u64 {
        self.draws += 1;
        self.rng.next_u64()
    }

    /// Choose a random element from a slice
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.below(items.len() as u32) as usize])
        }
    }
}
