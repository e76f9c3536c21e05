//! Deterministic random number generator
//!
//! Uses xorshift64 for reproducibility across platforms. Simulation code
//! never draws from non-deterministic sources; the one randomized decision
//! in the engine (the anti-stall nudge direction) comes from here so a
//! seeded run replays identically.

use serde::{Deserialize, Serialize};

/// A deterministic xorshift64 generator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimRng {
    state: u64,
}

impl SimRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        // xorshift requires a non-zero state
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate the next raw u64 value
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Generate a random f64 in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() as f64) / (u64::MAX as f64 + 1.0)
    }

    /// Uniformly pick -1.0 or +1.0
    pub fn next_sign(&mut self) -> f64 {
        if self.next_u64() & 1 == 0 {
            1.0
        } else {
            -1.0
        }
    }

    /// Current internal state, for saving and restoring
    pub fn state(&self) -> u64 {
        self.state
    }
}
