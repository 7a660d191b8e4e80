//! Node and output addressing.
//!
//! SlotKey = (NodeId, port) uniquely identifies one output value in the
//! graph. Ports index a node's declared outputs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a node in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Universal address for output values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotKey {
    /// The node producing the value
    pub node: NodeId,
    /// Position in the node's declared outputs
    pub port: u16,
}

impl SlotKey {
    pub fn new(node: NodeId, port: u16) -> Self {
        Self { node, port }
    }

    pub fn port_index(self) -> usize {
        self.port as usize
    }
}
