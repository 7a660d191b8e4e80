//! Diagnostics for the runtime.
//!
//! Provides "why did X change?" queries for debugging.

use crate::cache::Cache;
use crate::graph::Graph;
use crate::slot::NodeId;
use crate::tick::TickSeq;
use crate::value::Value;
use rustc_hash::FxHashSet;
use serde::Serialize;

/// A diagnostic query result showing why a cell changed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeReason {
    /// The node that changed
    pub node: String,
    /// When it changed
    pub changed_at: TickSeq,
    /// Direct upstream nodes that changed in the same pass
    pub triggered_by: Vec<String>,
}

fn changed_at(graph: &Graph, cache: &Cache, id: NodeId) -> Option<TickSeq> {
    if graph.node(id).is_control() {
        cache.control_changed_at(&id)
    } else {
        cache.get(&id).and_then(|e| e.last_changed)
    }
}

/// Query why a node last changed
pub fn why_did_change(graph: &Graph, cache: &Cache, id: NodeId) -> Option<ChangeReason> {
    let at = changed_at(graph, cache, id)?;
    let node = graph.node(id);

    let mut triggered_by: Vec<NodeId> = node
        .inputs()
        .iter()
        .map(|slot| slot.node)
        .filter(|&producer| {
            changed_at(graph, cache, producer)
                .map(|t| t.pass == at.pass)
                .unwrap_or(false)
        })
        .collect();
    triggered_by.sort_unstable();
    triggered_by.dedup();

    Some(ChangeReason {
        node: node.name().to_string(),
        changed_at: at,
        triggered_by: triggered_by
            .into_iter()
            .map(|p| graph.name(p).to_string())
            .collect(),
    })
}

/// Get the full change chain for debugging, starting at `id`
pub fn change_chain(graph: &Graph, cache: &Cache, id: NodeId) -> Vec<ChangeReason> {
    let mut chain = Vec::new();
    let mut visited = FxHashSet::default();
    let mut queue = vec![id];

    while let Some(current) = queue.pop() {
        if !visited.insert(current) {
            continue;
        }

        if let Some(reason) = why_did_change(graph, cache, current) {
            for trigger in &reason.triggered_by {
                if let Some(trigger_id) = graph.node_id(trigger) {
                    queue.push(trigger_id);
                }
            }
            chain.push(reason);
        }
    }

    chain
}

/// Diagnostics context for the runtime
#[derive(Debug, Default)]
pub struct DiagnosticsContext {
    /// Enable detailed tracking
    pub enabled: bool,
    /// Recorded change events
    pub changes: Vec<ChangeEvent>,
}

/// A recorded output change
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeEvent {
    pub pass: u64,
    pub cell: String,
    pub output: String,
    pub old_value: Option<Value>,
    pub new_value: Value,
}

impl DiagnosticsContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn record_change(
        &mut self,
        pass: u64,
        cell: &str,
        output: &str,
        old_value: Option<Value>,
        new_value: Value,
    ) {
        if self.enabled {
            self.changes.push(ChangeEvent {
                pass,
                cell: cell.to_string(),
                output: output.to_string(),
                old_value,
                new_value,
            });
        }
    }

    pub fn changes_at_pass(&self, pass: u64) -> Vec<&ChangeEvent> {
        self.changes.iter().filter(|e| e.pass == pass).collect()
    }
}
