//! Runtime: owns one graph and its cache and runs evaluation passes.
//!
//! Cells are evaluated lazily on first read and memoized against the stamps
//! of the controls they transitively read. A control write marks exactly the
//! transitive dependents that were already evaluated as Stale and
//! re-evaluates them in a single topological pass. Everything else is left
//! alone.

use crate::cache::{Cache, CacheEntry};
use crate::cell::{CellState, Inputs, Outputs};
use crate::control::Stamp;
use crate::diagnostics::{self, ChangeReason, DiagnosticsContext};
use crate::error::{Error, Result};
use crate::graph::{Graph, Node, NodeKind};
use crate::slot::{NodeId, SlotKey};
use crate::snapshot::GraphSnapshot;
use crate::tick::TickCounter;
use crate::value::Value;
use log::{debug, trace, warn};
use serde::Serialize;
use smallvec::SmallVec;

/// What started a pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Trigger {
    /// `evaluate_all`
    All,
    /// A lazy read of an output that was not current
    Read { name: String },
    /// An accepted control write
    Write {
        control: String,
        value: i64,
        stamp: Stamp,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedCell {
    pub cell: String,
    pub message: String,
}

/// Outcome of one pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassReport {
    pub pass: u64,
    pub trigger: Trigger,
    /// Cells whose body ran, in evaluation order (failed ones included)
    pub evaluated: Vec<String>,
    pub failed: Vec<FailedCell>,
}

impl PassReport {
    fn new(pass: u64, trigger: Trigger) -> Self {
        Self {
            pass,
            trigger,
            evaluated: Vec::new(),
            failed: Vec::new(),
        }
    }

    pub fn was_evaluated(&self, cell: &str) -> bool {
        self.evaluated.iter().any(|c| c == cell)
    }

    /// True when no cell failed during the pass
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// The reactive runtime
pub struct Runtime {
    graph: Graph,
    cache: Cache,
    ticks: TickCounter,
    diagnostics: DiagnosticsContext,
    last_report: Option<PassReport>,
}

impl Runtime {
    /// Wrap a graph. Nothing is evaluated until read or `evaluate_all`.
    pub fn new(graph: Graph) -> Self {
        Self {
            graph,
            cache: Cache::new(),
            ticks: TickCounter::new(),
            diagnostics: DiagnosticsContext::new(),
            last_report: None,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Get cache for queries
    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Number of passes run so far
    pub fn current_pass(&self) -> u64 {
        self.ticks.current_pass()
    }

    /// Report of the most recent pass
    pub fn last_report(&self) -> Option<&PassReport> {
        self.last_report.as_ref()
    }

    /// Cells the most recent pass evaluated, in order
    pub fn evaluation_order(&self) -> &[String] {
        self.last_report
            .as_ref()
            .map(|r| r.evaluated.as_slice())
            .unwrap_or_default()
    }

    /// Read an output by name, evaluating whatever it needs first.
    ///
    /// A Valid output is returned from the cache without running anything;
    /// the returned value shares its allocation with the cached one. A Failed
    /// cell yields its last-known-good output, or its error if it never
    /// succeeded.
    pub fn read(&mut self, name: &str) -> Result<Value> {
        let slot = self.resolve(name)?;
        if let Some(control) = self.graph.control(slot.node) {
            return Ok(Value::Int(control.read()));
        }

        let pending = self.pending_ancestors(slot.node);
        if !pending.is_empty() {
            let pass = self.ticks.next_pass();
            debug!("pass {pass}: reading `{name}` evaluates {} cell(s)", pending.len());
            let mut report = PassReport::new(
                pass,
                Trigger::Read {
                    name: name.to_string(),
                },
            );
            self.run_pass(&pending, &mut report);
            self.last_report = Some(report);
        }

        self.cached_output(slot)
    }

    /// Cached value of an output, without evaluating anything
    pub fn peek(&self, name: &str) -> Option<Value> {
        let slot = self.graph.producer(name)?;
        if let Some(control) = self.graph.control(slot.node) {
            return Some(Value::Int(control.read()));
        }
        self.cache.get(&slot.node)?.output(slot.port_index()).cloned()
    }

    /// Bring every cell up to date in one pass ("run all cells")
    pub fn evaluate_all(&mut self) -> PassReport {
        let pass = self.ticks.next_pass();
        let pending: Vec<NodeId> = self
            .graph
            .order()
            .iter()
            .copied()
            .filter(|&id| self.needs_evaluation(id))
            .collect();
        debug!("pass {pass}: evaluating {} of {} node(s)", pending.len(), self.graph.len());

        let mut report = PassReport::new(pass, Trigger::All);
        self.run_pass(&pending, &mut report);
        self.last_report = Some(report.clone());
        report
    }

    /// Write a control and propagate.
    ///
    /// Rejected values leave the control, the cache and the pass counter
    /// untouched. Accepted values advance the control's stamp by one, mark
    /// the already-evaluated transitive dependents Stale and re-evaluate
    /// them once each, dependencies first.
    pub fn write(&mut self, control: &str, value: i64) -> Result<PassReport> {
        let id = self
            .graph
            .node_id(control)
            .ok_or_else(|| Error::UnknownName(control.to_string()))?;
        let stamp = self
            .graph
            .control_mut(id)
            .ok_or_else(|| Error::NotAControl(control.to_string()))?
            .write(value)?;

        let pass = self.ticks.next_pass();
        let at = self.ticks.next();
        self.cache.record_control_change(id, at);

        let dependents = self.graph.transitive_dependents(id);
        let stale: Vec<NodeId> = self
            .graph
            .order()
            .iter()
            .copied()
            .filter(|n| dependents.contains(n))
            .filter(|n| self.cache.mark_stale(n))
            .collect();
        debug!(
            "pass {pass}: `{control}` = {value} (stamp {stamp}), {} stale of {} dependent(s)",
            stale.len(),
            dependents.len()
        );

        let mut report = PassReport::new(
            pass,
            Trigger::Write {
                control: control.to_string(),
                value,
                stamp,
            },
        );
        self.run_pass(&stale, &mut report);
        self.last_report = Some(report.clone());
        Ok(report)
    }

    pub fn control_value(&self, name: &str) -> Result<i64> {
        let id = self.node(name)?;
        self.graph
            .control(id)
            .map(|c| c.read())
            .ok_or_else(|| Error::NotAControl(name.to_string()))
    }

    pub fn stamp(&self, control: &str) -> Result<Stamp> {
        let id = self.node(control)?;
        self.graph
            .control(id)
            .map(|c| c.stamp())
            .ok_or_else(|| Error::NotAControl(control.to_string()))
    }

    /// State of a cell; controls always report Valid
    pub fn status(&self, node: &str) -> Result<CellState> {
        let id = self.node(node)?;
        if self.graph.node(id).is_control() {
            return Ok(CellState::Valid);
        }
        Ok(self.cache.state(&id))
    }

    /// How many times a cell's body has run
    pub fn eval_count(&self, cell: &str) -> Result<u64> {
        let id = self.node(cell)?;
        Ok(self.cache.get(&id).map(|e| e.eval_count).unwrap_or(0))
    }

    /// Error of the cell's last attempt, if it failed
    pub fn last_error(&self, cell: &str) -> Option<&Error> {
        let id = self.graph.node_id(cell)?;
        self.cache.get(&id)?.error.as_ref()
    }

    pub fn why_did_change(&self, node: &str) -> Result<Option<ChangeReason>> {
        let id = self.node(node)?;
        Ok(diagnostics::why_did_change(&self.graph, &self.cache, id))
    }

    pub fn change_chain(&self, node: &str) -> Result<Vec<ChangeReason>> {
        let id = self.node(node)?;
        Ok(diagnostics::change_chain(&self.graph, &self.cache, id))
    }

    /// Enable diagnostics
    pub fn enable_diagnostics(&mut self) {
        self.diagnostics.enable();
    }

    /// Get diagnostics context
    pub fn diagnostics(&self) -> &DiagnosticsContext {
        &self.diagnostics
    }

    /// Serializable view of controls and cells
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot::capture(&self.graph, &self.cache, self.ticks.current_pass())
    }

    fn node(&self, name: &str) -> Result<NodeId> {
        self.graph
            .node_id(name)
            .ok_or_else(|| Error::UnknownName(name.to_string()))
    }

    fn resolve(&self, output: &str) -> Result<SlotKey> {
        self.graph
            .producer(output)
            .ok_or_else(|| Error::UnknownName(output.to_string()))
    }

    fn needs_evaluation(&self, id: NodeId) -> bool {
        if self.graph.node(id).is_control() {
            return false;
        }
        match self.cache.get(&id) {
            None => true,
            Some(entry) => {
                entry.state == CellState::Stale
                    || entry.is_behind(&self.graph.stamp_snapshot(id))
            }
        }
    }

    /// `id` and its upstream cells that are not current, dependencies first
    fn pending_ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let ancestors = self.graph.ancestors_inclusive(id);
        self.graph
            .order()
            .iter()
            .copied()
            .filter(|n| ancestors.contains(n) && self.needs_evaluation(*n))
            .collect()
    }

    fn run_pass(&mut self, ids: &[NodeId], report: &mut PassReport) {
        for &id in ids {
            let outcome = self.evaluate_cell(id);
            report.evaluated.push(self.graph.name(id).to_string());
            if let Err(err) = outcome {
                report.failed.push(FailedCell {
                    cell: self.graph.name(id).to_string(),
                    message: err.to_string(),
                });
            }
        }
    }

    fn evaluate_cell(&mut self, id: NodeId) -> Result<()> {
        // Destructure to split borrows: the body lives in the graph while
        // the cache is mutated
        let Runtime {
            graph,
            cache,
            ticks,
            diagnostics,
            last_report: _,
        } = self;

        let node = graph.node(id);
        let NodeKind::Cell(body) = &node.kind else {
            return Ok(());
        };
        let at = ticks.next();
        let snapshot = graph.stamp_snapshot(id);

        let result = gather_inputs(graph, cache, node).and_then(|values| {
            let inputs = Inputs::new(&node.input_names, &values);
            match body(&inputs) {
                Ok(outputs) if outputs.len() == node.output_names.len() => Ok(outputs),
                Ok(outputs) => Err(Error::Computation {
                    cell: node.name.clone(),
                    message: format!(
                        "returned {} output(s), {} declared",
                        outputs.len(),
                        node.output_names.len()
                    ),
                }),
                Err(err) => Err(Error::Computation {
                    cell: node.name.clone(),
                    message: err.to_string(),
                }),
            }
        });

        let entry = cache.get_or_insert(id, || CacheEntry::new(at, snapshot.clone()));
        entry.computed_at = at;
        entry.snapshot = snapshot;
        entry.eval_count += 1;

        match result {
            Ok(outputs) => {
                if entry.outputs.as_ref() != Some(&outputs) {
                    entry.last_changed = Some(at);
                    if diagnostics.enabled {
                        record_changes(diagnostics, node, entry.outputs.as_ref(), &outputs, at.pass);
                    }
                }
                trace!("evaluated `{}` at {:?}", node.name, at);
                entry.outputs = Some(outputs);
                entry.state = CellState::Valid;
                entry.error = None;
                Ok(())
            }
            Err(err) => {
                warn!("cell `{}` failed: {err}", node.name);
                entry.state = CellState::Failed;
                entry.error = Some(err.clone());
                Err(err)
            }
        }
    }

    fn cached_output(&self, slot: SlotKey) -> Result<Value> {
        let node = self.graph.node(slot.node);
        let entry = self.cache.get(&slot.node).ok_or_else(|| Error::Computation {
            cell: node.name().to_string(),
            message: "not evaluated".to_string(),
        })?;
        if let Some(value) = entry.output(slot.port_index()) {
            return Ok(value.clone());
        }
        Err(entry.error.clone().unwrap_or_else(|| Error::Computation {
            cell: node.name().to_string(),
            message: "no value".to_string(),
        }))
    }
}

/// Current input values of `node`, in declaration order
fn gather_inputs(graph: &Graph, cache: &Cache, node: &Node) -> Result<SmallVec<[Value; 4]>> {
    node.inputs()
        .iter()
        .map(|slot| {
            let producer = graph.node(slot.node);
            if let Some(control) = producer.as_control() {
                return Ok(Value::Int(control.read()));
            }
            cache
                .get(&slot.node)
                .and_then(|e| e.output(slot.port_index()))
                .cloned()
                .ok_or_else(|| Error::UpstreamFailed {
                    cell: node.name().to_string(),
                    upstream: producer.name().to_string(),
                })
        })
        .collect()
}

fn record_changes(
    diagnostics: &mut DiagnosticsContext,
    node: &Node,
    old: Option<&Outputs>,
    new: &Outputs,
    pass: u64,
) {
    for (port, value) in new.iter().enumerate() {
        let previous = old.and_then(|o| o.get(port)).cloned();
        if previous.as_ref() != Some(value) {
            diagnostics.record_change(
                pass,
                node.name(),
                &node.output_names()[port],
                previous,
                value.clone(),
            );
        }
    }
}
