//! Reactive cell graph.
//!
//! Named cells declare the names they read and the names they produce;
//! controls hold user-mutable integers. The graph is wired by exact name
//! match and checked once. A [`Runtime`] owns the graph and a memoization
//! cache keyed by control stamps: writing a control re-runs exactly the
//! cells downstream of it, each once, dependencies first.
//!
//! ```
//! use cellflow::{CellSpec, ControlSpec, Domain, Graph, Runtime, Value, smallvec};
//!
//! let graph = Graph::builder()
//!     .control(ControlSpec::new("n", Domain::new(1, 10, 1), 2))
//!     .cell(
//!         CellSpec::new("square")
//!             .inputs(["n"])
//!             .outputs(["n2"])
//!             .body(|inputs| {
//!                 let n = inputs.int("n")?;
//!                 Ok(smallvec![Value::int(n * n)])
//!             }),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let mut runtime = Runtime::new(graph);
//! assert_eq!(runtime.read("n2").unwrap(), Value::int(4));
//! runtime.write("n", 3).unwrap();
//! assert_eq!(runtime.read("n2").unwrap(), Value::int(9));
//! ```

pub mod cache;
pub mod cell;
pub mod control;
pub mod diagnostics;
pub mod error;
pub mod graph;
pub mod runtime;
pub mod slot;
pub mod snapshot;
pub mod tick;
pub mod value;

pub use cell::{Body, CellSpec, CellState, Inputs, Outputs};
pub use control::{Control, ControlSpec, Domain, Stamp};
pub use error::{BodyError, ConstructionError, Error, Result};
pub use graph::{Binding, Graph, GraphBuilder};
pub use runtime::{FailedCell, PassReport, Runtime, Trigger};
pub use slot::{NodeId, SlotKey};
pub use snapshot::GraphSnapshot;
pub use value::{Figure, PlotSeries, SeriesKind, Table, Value};

pub use smallvec::smallvec;
