//! Explain command - applies one slider write and traces why a cell changed

use anyhow::{Context, Result, bail};
use cellflow::diagnostics::ChangeReason;
use cellflow_notebook::{Notebook, NotebookConfig};

pub fn run(config: &NotebookConfig, window: i64, cell: &str) -> Result<()> {
    let chain = explain(config, window, cell)?;
    if chain.is_empty() {
        bail!("'{cell}' has not changed");
    }
    for reason in &chain {
        println!("{}", describe(reason));
    }
    Ok(())
}

fn explain(config: &NotebookConfig, window: i64, cell: &str) -> Result<Vec<ChangeReason>> {
    let mut notebook = Notebook::new(config).context("Failed to build notebook graph")?;
    notebook.run_all();
    notebook
        .set_window(window)
        .with_context(|| format!("Failed to set window to {window}"))?;
    Ok(notebook.runtime().change_chain(cell)?)
}

fn describe(reason: &ChangeReason) -> String {
    let at = format!(
        "{} changed in pass {} (seq {})",
        reason.node, reason.changed_at.pass, reason.changed_at.seq
    );
    if reason.triggered_by.is_empty() {
        at
    } else {
        format!("{at} <- {}", reason.triggered_by.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commentary_traces_back_to_the_slider() {
        let chain = explain(&NotebookConfig::default(), 6, "commentary").unwrap();
        let nodes: Vec<&str> = chain.iter().map(|r| r.node.as_str()).collect();
        assert_eq!(nodes, vec!["commentary", "smoothing", "smoothing_slider"]);
        assert_eq!(chain[0].triggered_by, vec!["smoothing"]);
        assert_eq!(chain[1].triggered_by, vec!["smoothing_slider"]);
        assert!(describe(&chain[1]).ends_with("<- smoothing_slider"));
    }

    #[test]
    fn unknown_cell_is_an_error() {
        assert!(explain(&NotebookConfig::default(), 6, "nope").is_err());
    }
}
