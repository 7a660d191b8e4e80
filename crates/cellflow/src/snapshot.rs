//! Snapshot of runtime state.
//!
//! A serializable view of every control and cell, for CLI output and
//! debugging. Snapshots are read-only; nothing is restored from them.

use crate::cache::Cache;
use crate::cell::CellState;
use crate::control::{Domain, Stamp};
use crate::graph::Graph;
use crate::value::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A serializable snapshot of the reactive graph state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// Version for format changes
    pub version: u32,
    /// Passes run when the snapshot was taken
    pub pass: u64,
    /// Controls in declaration order
    pub controls: IndexMap<String, ControlSnapshot>,
    /// Cells in dependency order
    pub cells: IndexMap<String, CellSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlSnapshot {
    pub label: String,
    pub value: i64,
    pub stamp: Stamp,
    pub domain: Domain,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellSnapshot {
    pub state: CellState,
    pub eval_count: u64,
    /// Cached outputs by name; empty if never evaluated successfully
    pub outputs: IndexMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GraphSnapshot {
    /// Current snapshot version.
    pub const VERSION: u32 = 1;

    pub fn capture(graph: &Graph, cache: &Cache, pass: u64) -> Self {
        let controls = graph
            .nodes()
            .filter_map(|node| {
                node.as_control().map(|control| {
                    (
                        node.name().to_string(),
                        ControlSnapshot {
                            label: control.label().to_string(),
                            value: control.read(),
                            stamp: control.stamp(),
                            domain: control.domain(),
                        },
                    )
                })
            })
            .collect();

        let cells = graph
            .order()
            .iter()
            .map(|&id| graph.node(id))
            .filter(|node| !node.is_control())
            .map(|node| {
                let entry = cache.get(&node.id());
                let outputs = entry
                    .and_then(|e| e.outputs.as_ref())
                    .map(|outputs| {
                        node.output_names()
                            .iter()
                            .cloned()
                            .zip(outputs.iter().cloned())
                            .collect()
                    })
                    .unwrap_or_default();
                (
                    node.name().to_string(),
                    CellSnapshot {
                        state: cache.state(&node.id()),
                        eval_count: entry.map(|e| e.eval_count).unwrap_or(0),
                        outputs,
                        error: entry.and_then(|e| e.error.as_ref()).map(|e| e.to_string()),
                    },
                )
            })
            .collect();

        Self {
            version: Self::VERSION,
            pass,
            controls,
            cells,
        }
    }

    pub fn cell(&self, name: &str) -> Option<&CellSnapshot> {
        self.cells.get(name)
    }
}
