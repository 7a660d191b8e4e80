//! Dependency graph.
//!
//! Built once from declared controls and cells. Bindings are inferred by
//! exact name match between a cell's declared inputs and the outputs of
//! other nodes, then checked: every input bound to exactly one producer,
//! no cycles. The topological order and per-node upstream controls are
//! computed here so the runtime never has to rediscover them.

use crate::cell::{Body, CellSpec};
use crate::control::{Control, ControlSpec, Stamp};
use crate::error::ConstructionError;
use crate::slot::{NodeId, SlotKey};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use std::collections::VecDeque;

/// What a node does
pub enum NodeKind {
    Control(Control),
    Cell(Body),
}

/// A node of the built graph
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) name: String,
    pub(crate) kind: NodeKind,
    pub(crate) input_names: Vec<String>,
    pub(crate) output_names: Vec<String>,
    /// Producer of each declared input, same order as `input_names`
    pub(crate) inputs: SmallVec<[SlotKey; 4]>,
    /// Direct consumers, deduplicated, ascending
    pub(crate) dependents: SmallVec<[NodeId; 4]>,
    /// Every control this node transitively reads, ascending
    pub(crate) upstream_controls: SmallVec<[NodeId; 4]>,
    /// Longest path from a node without inputs
    pub(crate) depth: usize,
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_control(&self) -> bool {
        matches!(self.kind, NodeKind::Control(_))
    }

    pub fn as_control(&self) -> Option<&Control> {
        match &self.kind {
            NodeKind::Control(control) => Some(control),
            NodeKind::Cell(_) => None,
        }
    }

    pub fn input_names(&self) -> &[String] {
        &self.input_names
    }

    pub fn output_names(&self) -> &[String] {
        &self.output_names
    }

    pub fn inputs(&self) -> &[SlotKey] {
        &self.inputs
    }

    pub fn dependents(&self) -> &[NodeId] {
        &self.dependents
    }

    pub fn upstream_controls(&self) -> &[NodeId] {
        &self.upstream_controls
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// A resolved dependency edge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    pub producer: SlotKey,
    pub consumer: NodeId,
}

enum Declared {
    Control(ControlSpec),
    Cell(CellSpec),
}

impl Declared {
    fn name(&self) -> &str {
        match self {
            Declared::Control(spec) => &spec.name,
            Declared::Cell(spec) => &spec.name,
        }
    }
}

/// Collects declarations; `build` validates and wires them.
#[derive(Default)]
pub struct GraphBuilder {
    declared: Vec<Declared>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn control(mut self, spec: ControlSpec) -> Self {
        self.add_control(spec);
        self
    }

    pub fn cell(mut self, spec: CellSpec) -> Self {
        self.add_cell(spec);
        self
    }

    pub fn add_control(&mut self, spec: ControlSpec) {
        self.declared.push(Declared::Control(spec));
    }

    pub fn add_cell(&mut self, spec: CellSpec) {
        self.declared.push(Declared::Cell(spec));
    }

    pub fn build(self) -> Result<Graph, ConstructionError> {
        let mut by_name: FxHashMap<String, NodeId> = FxHashMap::default();
        let mut producers: FxHashMap<String, SlotKey> = FxHashMap::default();
        let mut nodes: Vec<Node> = Vec::with_capacity(self.declared.len());

        // Pass 1: ids, outputs, control validation
        for (index, declared) in self.declared.into_iter().enumerate() {
            let id = NodeId(index as u32);
            let name = declared.name().to_string();
            if by_name.insert(name.clone(), id).is_some() {
                return Err(ConstructionError::DuplicateNode(name));
            }

            let (kind, input_names, output_names) = match declared {
                Declared::Control(spec) => {
                    let control = Control::from_spec(spec)?;
                    (NodeKind::Control(control), Vec::new(), vec![name.clone()])
                }
                Declared::Cell(spec) => (NodeKind::Cell(spec.body), spec.inputs, spec.outputs),
            };

            for (port, output) in output_names.iter().enumerate() {
                let slot = SlotKey::new(id, port as u16);
                if let Some(previous) = producers.insert(output.clone(), slot) {
                    return Err(ConstructionError::DuplicateOutput {
                        output: output.clone(),
                        first: nodes
                            .get(previous.node.index())
                            .map(|n| n.name.clone())
                            .unwrap_or_else(|| name.clone()),
                        second: name,
                    });
                }
            }

            nodes.push(Node {
                id,
                name,
                kind,
                input_names,
                output_names,
                inputs: SmallVec::new(),
                dependents: SmallVec::new(),
                upstream_controls: SmallVec::new(),
                depth: 0,
            });
        }

        // Pass 2: resolve inputs by exact name
        for node in nodes.iter_mut() {
            let mut seen: FxHashSet<&str> = FxHashSet::default();
            for input in &node.input_names {
                if !seen.insert(input.as_str()) {
                    return Err(ConstructionError::DuplicateInput {
                        cell: node.name.clone(),
                        input: input.clone(),
                    });
                }
                let slot = producers.get(input).copied().ok_or_else(|| {
                    ConstructionError::UnresolvedInput {
                        cell: node.name.clone(),
                        input: input.clone(),
                    }
                })?;
                node.inputs.push(slot);
            }
        }

        // Pass 3: dependents
        let mut dependents: Vec<SmallVec<[NodeId; 4]>> = vec![SmallVec::new(); nodes.len()];
        for node in &nodes {
            for slot in &node.inputs {
                let list = &mut dependents[slot.node.index()];
                if !list.contains(&node.id) {
                    list.push(node.id);
                }
            }
        }
        for (node, mut list) in nodes.iter_mut().zip(dependents) {
            list.sort_unstable();
            node.dependents = list;
        }

        let order = topological_order(&nodes)?;

        // Pass 4: depth and upstream controls, in dependency order
        for &id in &order {
            let (depth, controls) = {
                let node = &nodes[id.index()];
                let mut depth = 0;
                let mut controls: SmallVec<[NodeId; 4]> = SmallVec::new();
                for slot in &node.inputs {
                    let producer = &nodes[slot.node.index()];
                    depth = depth.max(producer.depth + 1);
                    if producer.is_control() {
                        controls.push(producer.id);
                    }
                    controls.extend(producer.upstream_controls.iter().copied());
                }
                controls.sort_unstable();
                controls.dedup();
                (depth, controls)
            };
            let node = &mut nodes[id.index()];
            node.depth = depth;
            node.upstream_controls = controls;
        }

        let max_depth = nodes.iter().map(|n| n.depth).max().unwrap_or(0);
        let mut levels: Vec<Vec<NodeId>> = if nodes.is_empty() {
            Vec::new()
        } else {
            vec![Vec::new(); max_depth + 1]
        };
        for &id in &order {
            levels[nodes[id.index()].depth].push(id);
        }

        Ok(Graph {
            nodes,
            by_name,
            producers,
            order,
            levels,
        })
    }
}

/// Kahn's algorithm; ties resolve in declaration order.
fn topological_order(nodes: &[Node]) -> Result<Vec<NodeId>, ConstructionError> {
    let mut in_degree: Vec<usize> = nodes
        .iter()
        .map(|n| {
            let mut producers: SmallVec<[NodeId; 4]> = n.inputs.iter().map(|s| s.node).collect();
            producers.sort_unstable();
            producers.dedup();
            producers.len()
        })
        .collect();

    let mut ready: VecDeque<NodeId> = nodes
        .iter()
        .filter(|n| in_degree[n.id.index()] == 0)
        .map(|n| n.id)
        .collect();
    let mut order = Vec::with_capacity(nodes.len());

    while let Some(id) = ready.pop_front() {
        order.push(id);
        for &dependent in &nodes[id.index()].dependents {
            let degree = &mut in_degree[dependent.index()];
            *degree -= 1;
            if *degree == 0 {
                ready.push_back(dependent);
            }
        }
    }

    if order.len() != nodes.len() {
        let cells = cycle_members(nodes, &in_degree)
            .into_iter()
            .map(|id| nodes[id.index()].name.clone())
            .collect();
        return Err(ConstructionError::Cycle { cells });
    }
    Ok(order)
}

/// Narrow the nodes Kahn could not place down to those on a cycle.
///
/// The leftovers also hold everything downstream of a cycle. Those are
/// peeled off by repeatedly dropping leftovers that no other leftover
/// depends on.
fn cycle_members(nodes: &[Node], in_degree: &[usize]) -> Vec<NodeId> {
    let mut remaining: Vec<bool> = in_degree.iter().map(|&d| d > 0).collect();
    loop {
        let sinks: Vec<usize> = (0..nodes.len())
            .filter(|&i| remaining[i])
            .filter(|&i| !nodes[i].dependents.iter().any(|d| remaining[d.index()]))
            .collect();
        if sinks.is_empty() {
            break;
        }
        for i in sinks {
            remaining[i] = false;
        }
    }
    nodes
        .iter()
        .filter(|n| remaining[n.id.index()])
        .map(|n| n.id)
        .collect()
}

/// A validated, acyclic set of controls and cells
pub struct Graph {
    nodes: Vec<Node>,
    by_name: FxHashMap<String, NodeId>,
    producers: FxHashMap<String, SlotKey>,
    order: Vec<NodeId>,
    levels: Vec<Vec<NodeId>>,
}

impl Graph {
    pub fn builder() -> GraphBuilder {
        GraphBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Look up a node by its declared name
    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, id: NodeId) -> &str {
        &self.nodes[id.index()].name
    }

    /// Which node output an input name binds to
    pub fn producer(&self, output: &str) -> Option<SlotKey> {
        self.producers.get(output).copied()
    }

    pub fn output_name(&self, slot: SlotKey) -> &str {
        &self.nodes[slot.node.index()].output_names[slot.port_index()]
    }

    /// All nodes, dependencies first
    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    /// Nodes grouped by depth; nodes within a level are independent
    pub fn levels(&self) -> &[Vec<NodeId>] {
        &self.levels
    }

    pub fn bindings(&self) -> impl Iterator<Item = Binding> + '_ {
        self.nodes.iter().flat_map(|node| {
            node.input_names
                .iter()
                .zip(node.inputs.iter())
                .map(move |(name, slot)| Binding {
                    name: name.clone(),
                    producer: *slot,
                    consumer: node.id,
                })
        })
    }

    /// Every node reachable from `id` along bindings, excluding `id` itself
    pub fn transitive_dependents(&self, id: NodeId) -> FxHashSet<NodeId> {
        let mut seen = FxHashSet::default();
        let mut queue: Vec<NodeId> = self.nodes[id.index()].dependents.to_vec();
        while let Some(current) = queue.pop() {
            if seen.insert(current) {
                queue.extend(self.nodes[current.index()].dependents.iter().copied());
            }
        }
        seen
    }

    /// `id` and every node it transitively reads
    pub fn ancestors_inclusive(&self, id: NodeId) -> FxHashSet<NodeId> {
        let mut seen = FxHashSet::default();
        let mut queue = vec![id];
        while let Some(current) = queue.pop() {
            if seen.insert(current) {
                queue.extend(self.nodes[current.index()].inputs.iter().map(|s| s.node));
            }
        }
        seen
    }

    pub fn control(&self, id: NodeId) -> Option<&Control> {
        self.nodes[id.index()].as_control()
    }

    pub(crate) fn control_mut(&mut self, id: NodeId) -> Option<&mut Control> {
        match &mut self.nodes[id.index()].kind {
            NodeKind::Control(control) => Some(control),
            NodeKind::Cell(_) => None,
        }
    }

    /// Current stamps of the controls `id` depends on
    pub fn stamp_snapshot(&self, id: NodeId) -> SmallVec<[(NodeId, Stamp); 4]> {
        self.nodes[id.index()]
            .upstream_controls
            .iter()
            .filter_map(|&c| self.control(c).map(|control| (c, control.stamp())))
            .collect()
    }
}
