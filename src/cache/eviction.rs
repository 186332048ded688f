// Cache eviction policies
// Author: kelexine (https://github.com/kelexine)

use std::fmt::Debug;

/// Decides when the response cache is dropped wholesale.
///
/// The policy only sees user-initiated cycles, never individual lookups.
pub trait EvictionPolicy: Debug + Send + Sync {
    /// Record one completed cycle. Returns `true` when the cache must be
    /// cleared now.
    fn on_operation(&mut self) -> bool;

    /// Cycles counted since the last clear.
    fn operation_count(&self) -> u32;

    /// Forget counted cycles after an out-of-band clear.
    fn reset(&mut self);
}

/// Clears everything, live entries included, once the cycle counter
/// exceeds `every`, then starts counting again from zero.
#[derive(Debug, Clone)]
pub struct PeriodicClear {
    every: u32,
    count: u32,
}

impl PeriodicClear {
    pub fn new(every: u32) -> Self {
        Self { every, count: 0 }
    }
}

impl Default for PeriodicClear {
    fn default() -> Self {
        Self::new(10)
    }
}

impl EvictionPolicy for PeriodicClear {
    fn on_operation(&mut self) -> bool {
        self.count += 1;
        if self.count > self.every {
            self.count = 0;
            return true;
        }
        false
    }

    fn operation_count(&self) -> u32 {
        self.count
    }

    fn reset(&mut self) {
        self.count = 0;
    }
}
