//! Memoization cache.
//!
//! CacheEntry tracks a cell's last outputs together with the control stamps
//! they were computed from, for staleness checks and "why did X change?"
//! queries. A cell without an entry has never been evaluated.

use crate::cell::{CellState, Outputs};
use crate::control::Stamp;
use crate::error::Error;
use crate::slot::NodeId;
use crate::tick::TickSeq;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Stamps of the upstream controls at evaluation time
pub type StampSnapshot = SmallVec<[(NodeId, Stamp); 4]>;

/// A cached computation result
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub state: CellState,
    /// Last successful outputs; kept as last-known-good when a later
    /// evaluation fails
    pub outputs: Option<Outputs>,
    /// Error of the last attempt, if it failed
    pub error: Option<Error>,
    /// When the last attempt ran
    pub computed_at: TickSeq,
    /// When the outputs last changed; None until a first success
    pub last_changed: Option<TickSeq>,
    /// Upstream control stamps recorded by the last attempt
    pub snapshot: StampSnapshot,
    /// Number of times the body ran
    pub eval_count: u64,
}

impl CacheEntry {
    pub fn new(computed_at: TickSeq, snapshot: StampSnapshot) -> Self {
        Self {
            state: CellState::Unevaluated,
            outputs: None,
            error: None,
            computed_at,
            last_changed: None,
            snapshot,
            eval_count: 0,
        }
    }

    /// True when any recorded stamp differs from `current`
    pub fn is_behind(&self, current: &StampSnapshot) -> bool {
        self.snapshot != *current
    }

    pub fn output(&self, port: usize) -> Option<&crate::value::Value> {
        self.outputs.as_ref().and_then(|o| o.get(port))
    }
}

/// Cache for computed values, plus the last write of each control
#[derive(Debug, Default)]
pub struct Cache {
    entries: FxHashMap<NodeId, CacheEntry>,
    control_changes: FxHashMap<NodeId, TickSeq>,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &NodeId) -> Option<&CacheEntry> {
        self.entries.get(id)
    }

    pub fn get_or_insert(&mut self, id: NodeId, make: impl FnOnce() -> CacheEntry) -> &mut CacheEntry {
        self.entries.entry(id).or_insert_with(make)
    }

    pub fn state(&self, id: &NodeId) -> CellState {
        self.entries
            .get(id)
            .map(|e| e.state)
            .unwrap_or(CellState::Unevaluated)
    }

    /// Mark a cached cell Stale. Unevaluated cells stay unevaluated.
    pub fn mark_stale(&mut self, id: &NodeId) -> bool {
        match self.entries.get_mut(id) {
            Some(entry) => {
                entry.state = CellState::Stale;
                true
            }
            None => false,
        }
    }

    pub fn record_control_change(&mut self, id: NodeId, at: TickSeq) {
        self.control_changes.insert(id, at);
    }

    /// When a control was last written, if ever
    pub fn control_changed_at(&self, id: &NodeId) -> Option<TickSeq> {
        self.control_changes.get(id).copied()
    }
}
