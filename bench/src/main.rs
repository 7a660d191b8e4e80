//! Quick timing of slider writes without criterion.

use bench::{INPUT, chain_graph, chain_tail};
use cellflow::Runtime;
use cellflow_notebook::{Notebook, NotebookConfig};
use std::time::Instant;

fn main() {
    println!("=== Quick Propagation Timing ===\n");

    for n in [10, 100, 1000] {
        let mut runtime = Runtime::new(chain_graph(n));
        let start = Instant::now();
        let tail = chain_tail(n);
        if let Err(err) = runtime.read(&tail) {
            panic!("reading `{tail}` failed: {err}");
        }
        let first = start.elapsed();

        let start = Instant::now();
        for value in 2..=101 {
            if let Err(err) = runtime.write(INPUT, value) {
                panic!("writing {value} to `{INPUT}` failed: {err}");
            }
        }
        println!(
            "chain of {n}: first read {:?}, 100 writes {:?}",
            first,
            start.elapsed()
        );
    }

    let mut notebook = match Notebook::new(&NotebookConfig::default()) {
        Ok(notebook) => notebook,
        Err(err) => panic!("notebook graph: {err}"),
    };
    notebook.run_all();
    let start = Instant::now();
    for window in (1..=20).cycle().take(200) {
        if let Err(err) = notebook.set_window(window) {
            panic!("window {window} rejected: {err}");
        }
    }
    println!("notebook: 200 slider writes {:?}", start.elapsed());
}
