//! Deterministic random number generation.
//!
//! RULE: Nothing in the game may call any platform RNG.
//! All randomness flows through GameRng instances derived
//! from the single master seed the engine was built with.
//!
//! Each concern gets its own stream, seeded deterministically
//! from (master_seed XOR slot_index). This means:
//!   - Adding a new stream never changes existing streams.
//!   - Amount draws stay reproducible no matter how ids are generated.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// A named, deterministic RNG stream.
pub struct GameRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl GameRng {
    /// Create a stream from the master seed and a stable slot index.
    /// The index must never change once assigned.
    pub fn new(master_seed: u64, slot_index: u64) -> Self {
        let derived_seed = master_seed ^ (slot_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Draw a raw u64 (full range).
    pub fn next_u64(&mut self) -> u64 {
        use rand::RngCore;
        self.inner.next_u64()
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.gen_range(0..n)
    }

    /// Roll an i64 uniformly in [lo, hi]. Callers order the bounds.
    pub fn next_i64_in(&mut self, lo: i64, hi: i64) -> i64 {
        assert!(lo <= hi, "lo must be <= hi");
        self.inner.gen_range(lo..=hi)
    }

    /// A lowercase base-36 token of `len` characters.
    pub fn next_token(&mut self, len: usize) -> String {
        (0..len)
            .map(|_| BASE36[self.next_u64_below(BASE36.len() as u64) as usize] as char)
            .collect()
    }
}

/// All RNG streams for a single run, indexed by stable slot.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    pub fn for_slot(&self, slot: StreamSlot) -> GameRng {
        GameRng::new(self.master_seed, slot as u64).with_name(slot.name())
    }
}

/// Stable stream slot assignments.
/// NEVER reorder or remove entries. Only append.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum StreamSlot {
    Amount = 0,
    SessionId = 1,
}

impl StreamSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Amount => "amount",
            Self::SessionId => "session_id",
        }
    }
}
