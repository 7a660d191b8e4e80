//! Graph command - prints evaluation levels and bindings

use anyhow::{Context, Result};
use cellflow::Graph;
use cellflow_notebook::{NotebookConfig, build_graph};

pub fn run(config: &NotebookConfig) -> Result<()> {
    let graph = build_graph(config).context("Failed to build notebook graph")?;
    print!("{}", render(&graph));
    Ok(())
}

fn render(graph: &Graph) -> String {
    let mut out = String::new();

    out.push_str("levels:\n");
    for (depth, level) in graph.levels().iter().enumerate() {
        let names: Vec<&str> = level.iter().map(|&id| graph.name(id)).collect();
        out.push_str(&format!("  {depth}: {}\n", names.join(", ")));
    }

    out.push_str("bindings:\n");
    for binding in graph.bindings() {
        out.push_str(&format!(
            "  {}: {} -> {}\n",
            binding.name,
            graph.name(binding.producer.node),
            graph.name(binding.consumer)
        ));
    }
    out
}
