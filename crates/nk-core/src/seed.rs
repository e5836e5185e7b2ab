//! Explicit replicate seed counter.

use serde::{Deserialize, Serialize};

/// Monotone seed source shared by every condition and replicate of a
/// provisioning pass.
///
/// The counter holds the last seed handed out. Each call to
/// [`SeedCounter::next_seed`] advances it by one, so seeds issued within a
/// pass are strictly increasing and never repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeedCounter {
    last: u64,
}

impl SeedCounter {
    /// Creates a counter whose first issued seed is `start + 1`.
    pub const fn starting_at(start: u64) -> Self {
        Self { last: start }
    }

    /// Advances the counter and returns the new seed.
    pub fn next_seed(&mut self) -> u64 {
        self.last += 1;
        self.last
    }

    /// Returns the most recently issued seed (or the start value).
    pub fn last(&self) -> u64 {
        self.last
    }
}
