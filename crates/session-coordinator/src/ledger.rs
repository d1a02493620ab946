//! Generation ledger used to cancel superseded revalidation runs.
//!
//! Every scheduled run is stamped with a generation token. Starting a new
//! run (or logging out, or tearing the coordinator down) bumps the ledger,
//! which invalidates every token minted before it. In-flight runs check
//! their token before every network call and store write, and again
//! after every backoff sleep, abandoning the run the moment it is
//! stale. This is cooperative
//! cancellation: nothing is aborted mid-await, stale work just stops
//! producing effects.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Token identifying one scheduled revalidation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Generation(u64);

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic counter handing out generation tokens.
#[derive(Debug, Default)]
pub struct GenerationLedger {
    current: AtomicU64,
}

impl GenerationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a fresh generation, invalidating every earlier token.
    pub fn begin_new(&self) -> Generation {
        Generation(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `generation` is still the latest one minted.
    pub fn is_current(&self, generation: Generation) -> bool {
        self.current.load(Ordering::SeqCst) == generation.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_token_is_current() {
        let ledger = GenerationLedger::new();
        let gen = ledger.begin_new();
        assert!(ledger.is_current(gen));
    }

    #[test]
    fn new_generation_invalidates_older_tokens() {
        let ledger = GenerationLedger::new();
        let first = ledger.begin_new();
        let second = ledger.begin_new();
        assert!(!ledger.is_current(first));
        assert!(ledger.is_current(second));
    }

    #[test]
    fn generations_are_strictly_increasing() {
        let ledger = GenerationLedger::new();
        let a = ledger.begin_new();
        let b = ledger.begin_new();
        let c = ledger.begin_new();
        assert!(a < b && b < c);
    }
}
