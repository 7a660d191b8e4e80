//! Pass sequencing.
//!
//! A pass is one scheduler run (initial evaluation, a lazy read, or the
//! propagation after a control write). TickSeq orders evaluations within
//! and across passes.

use serde::{Deserialize, Serialize};

/// Ordering within and across passes
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct TickSeq {
    /// The pass number
    pub pass: u64,
    /// Sequence within the pass
    pub seq: u32,
}

impl TickSeq {
    pub fn new(pass: u64, seq: u32) -> Self {
        Self { pass, seq }
    }

    /// Check if this is from the given pass
    pub fn is_current(&self, current_pass: u64) -> bool {
        self.pass == current_pass
    }
}

/// Counter for generating TickSeq values
#[derive(Debug, Default)]
pub struct TickCounter {
    current_pass: u64,
    current_seq: u32,
}

impl TickCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new pass
    pub fn next_pass(&mut self) -> u64 {
        self.current_pass += 1;
        self.current_seq = 0;
        self.current_pass
    }

    pub fn current_pass(&self) -> u64 {
        self.current_pass
    }

    /// Get next TickSeq and increment counter
    pub fn next(&mut self) -> TickSeq {
        let ts = TickSeq::new(self.current_pass, self.current_seq);
        self.current_seq += 1;
        ts
    }
}
