//! Graph shapes shared by the benchmarks and the quick timing binary.

use cellflow::{CellSpec, ControlSpec, Domain, Graph, Value, smallvec};

/// Name of the single control in every shape
pub const INPUT: &str = "k";

fn input_control() -> ControlSpec {
    ControlSpec::new(INPUT, Domain::new(1, 1000, 1), 1)
}

fn increment(name: String, input: String) -> CellSpec {
    CellSpec::new(name.clone())
        .inputs([input.clone()])
        .outputs([format!("{name}_out")])
        .body(move |inputs| Ok(smallvec![Value::int(inputs.int(&input)? + 1)]))
}

/// `k -> c0 -> c1 -> ... -> c(n-1)`; a write re-runs all `n` cells
pub fn chain_graph(n: usize) -> Graph {
    let mut builder = Graph::builder().control(input_control());
    let mut previous = INPUT.to_string();
    for i in 0..n {
        let name = format!("c{i}");
        builder.add_cell(increment(name.clone(), previous));
        previous = format!("{name}_out");
    }
    match builder.build() {
        Ok(graph) => graph,
        Err(err) => panic!("chain graph: {err}"),
    }
}

/// `n` cells reading `k` directly, plus `n` cells reading nothing
pub fn fan_graph(n: usize) -> Graph {
    let mut builder = Graph::builder().control(input_control());
    for i in 0..n {
        builder.add_cell(increment(format!("f{i}"), INPUT.to_string()));
        builder.add_cell(
            CellSpec::new(format!("idle{i}"))
                .outputs([format!("idle{i}_out")])
                .body(move |_| Ok(smallvec![Value::int(i as i64)])),
        );
    }
    match builder.build() {
        Ok(graph) => graph,
        Err(err) => panic!("fan graph: {err}"),
    }
}

/// Last output name of a chain of `n` cells
pub fn chain_tail(n: usize) -> String {
    format!("c{}_out", n.saturating_sub(1))
}
