//! The shared health flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Process-wide health flag shared by every handler.
///
/// Cloning shares the underlying flag. Reads and toggles are lock-free;
/// `toggle` is a single atomic flip, so any number of concurrent toggles is
/// equivalent to some serial order of the same toggles.
#[derive(Debug, Clone)]
pub struct HealthFlag {
    healthy: Arc<AtomicBool>,
}

impl HealthFlag {
    /// Create a new flag, initially healthy.
    pub fn new() -> Self {
        Self {
            healthy: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Current health value.
    pub fn get(&self) -> bool {
        self.healthy.load(Ordering::SeqCst)
    }

    /// Flip the flag and return the new value.
    pub fn toggle(&self) -> bool {
        // fetch_xor returns the previous value.
        !self.healthy.fetch_xor(true, Ordering::SeqCst)
    }
}

impl Default for HealthFlag {
    fn default() -> Self {
        Self::new()
    }
}
