//! Run command - evaluates the notebook and replays slider writes

use crate::OutputFormat;
use anyhow::{Context, Result};
use cellflow::{Figure, GraphSnapshot, PassReport, SeriesKind, Trigger};
use cellflow_notebook::{Notebook, NotebookConfig};
use serde::Serialize;

/// One JSON line per pass
#[derive(Serialize)]
struct PassOutput<'a> {
    report: &'a PassReport,
    snapshot: GraphSnapshot,
}

pub fn run(config: &NotebookConfig, windows: &[i64], output: OutputFormat) -> Result<()> {
    let mut notebook = Notebook::new(config).context("Failed to build notebook graph")?;

    let report = notebook.run_all();
    emit(&mut notebook, &report, output)?;

    for &window in windows {
        let report = notebook
            .set_window(window)
            .inspect_err(|e| log::warn!("Window {window} rejected: {e}"))
            .with_context(|| format!("Failed to set window to {window}"))?;
        emit(&mut notebook, &report, output)?;
    }

    Ok(())
}

fn emit(notebook: &mut Notebook, report: &PassReport, output: OutputFormat) -> Result<()> {
    log::info!(
        "Pass {}: {} evaluated, {} failed",
        report.pass,
        report.evaluated.len(),
        report.failed.len()
    );
    for failed in &report.failed {
        log::warn!("Cell {} failed: {}", failed.cell, failed.message);
    }
    match output {
        OutputFormat::Json => {
            let line = serde_json::to_string(&PassOutput {
                report,
                snapshot: notebook.runtime().snapshot(),
            })?;
            println!("{line}");
        }
        OutputFormat::Text => print_text(notebook, report)?,
    }
    Ok(())
}

fn print_text(notebook: &mut Notebook, report: &PassReport) -> Result<()> {
    println!(
        "pass {} ({}): evaluated {}",
        report.pass,
        describe(&report.trigger),
        if report.evaluated.is_empty() {
            "nothing".to_string()
        } else {
            report.evaluated.join(", ")
        }
    );
    for failed in &report.failed {
        eprintln!("  {} failed: {}", failed.cell, failed.message);
    }

    println!("window = {}", notebook.window()?);
    println!("{}", notebook.commentary()?);
    println!("{}", describe_figure(&*notebook.figure()?));
    println!();
    Ok(())
}

fn describe(trigger: &Trigger) -> String {
    match trigger {
        Trigger::All => "run all".to_string(),
        Trigger::Read { name } => format!("read {name}"),
        Trigger::Write {
            control,
            value,
            stamp,
        } => format!("{control} = {value}, stamp {stamp}"),
    }
}

fn describe_figure(figure: &Figure) -> String {
    let series: Vec<String> = figure
        .series
        .iter()
        .map(|s| {
            let kind = match s.kind {
                SeriesKind::Scatter => "scatter",
                SeriesKind::Line => "line",
            };
            format!("{} ({kind}, {} points)", s.label, s.y.len())
        })
        .collect();
    format!("figure \"{}\": {}", figure.title, series.join("; "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_write_triggers() {
        let trigger = Trigger::Write {
            control: "smoothing_slider".to_string(),
            value: 7,
            stamp: 2,
        };
        assert_eq!(describe(&trigger), "smoothing_slider = 7, stamp 2");
        assert_eq!(describe(&Trigger::All), "run all");
    }

    #[test]
    fn figure_summary_lists_series() {
        let mut notebook = Notebook::new(&NotebookConfig::default()).unwrap();
        notebook.set_window(4).unwrap();
        let summary = describe_figure(&notebook.figure().unwrap());
        assert_eq!(
            summary,
            "figure \"Relationship Between x and y\": \
             Raw Data (scatter, 100 points); Smoothed (window=4) (line, 100 points)"
        );
    }
}
