//! SplitMix64 source for archetype selection. Deterministic for a given seed;
//! [Rng::from_entropy] gives each request its own unpredictable stream.
//! Not cryptographically secure.

use std::time::{SystemTime, UNIX_EPOCH};

const SPLITMIX64_GOLDEN: u64 = 0x9e3779b97f4a7c15;
const SPLITMIX64_M1: u64 = 0xbf58476d1ce4e5b9;
const SPLITMIX64_M2: u64 = 0x94d049bb133111eb;

#[derive(Debug, Clone, Copy)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seed from the OS, falling back to the clock if that is unavailable.
    pub fn from_entropy() -> Self {
        let mut bytes = [0_u8; 8];
        match getrandom::getrandom(&mut bytes) {
            Ok(()) => Self::new(u64::from_le_bytes(bytes)),
            Err(err) => {
                tracing::warn!(%err, "os entropy unavailable, seeding from clock");
                let nanos = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_nanos() as u64)
                    .unwrap_or_default();
                Self::new(nanos)
            }
        }
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(SPLITMIX64_GOLDEN);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(SPLITMIX64_M1);
        z = (z ^ (z >> 27)).wrapping_mul(SPLITMIX64_M2);
        z ^ (z >> 31)
    }

    /// Uniform value in `0..bound` (multiply-shift reduction). `bound == 0` yields 0.
    pub fn below(&mut self, bound: u64) -> u64 {
        ((self.next_u64() as u128 * bound as u128) >> 64) as u64
    }
}
