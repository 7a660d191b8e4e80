//! Test harness for driving the notebook without a front end.
//! Wraps [`Notebook`] with slider moves that must succeed and assertions
//! over values, pass reports and evaluation counts.

use crate::config::NotebookConfig;
use crate::notebook::Notebook;
use cellflow::{CellState, PassReport, Value};

/// Test wrapper that provides convenient test methods
pub struct TestNotebook {
    notebook: Notebook,
    last: Option<PassReport>,
}

impl TestNotebook {
    /// Notebook with the default configuration
    pub fn new() -> Self {
        Self::with_config(&NotebookConfig::default())
    }

    pub fn with_config(config: &NotebookConfig) -> Self {
        let notebook = match Notebook::new(config) {
            Ok(notebook) => notebook,
            Err(err) => panic!("notebook graph does not build: {err}"),
        };
        Self {
            notebook,
            last: None,
        }
    }

    /// Run all cells and check that none failed
    pub fn run_all(&mut self) -> &PassReport {
        let report = self.notebook.run_all();
        assert!(report.is_clean(), "run_all failed: {:?}", report.failed);
        self.last.insert(report)
    }

    /// Move the slider; the write must be accepted
    pub fn set_window(&mut self, window: i64) -> &PassReport {
        let report = match self.notebook.set_window(window) {
            Ok(report) => report,
            Err(err) => panic!("window {window} rejected: {err}"),
        };
        self.last.insert(report)
    }

    /// Read a value
    pub fn read(&mut self, name: &str) -> Value {
        match self.notebook.runtime_mut().read(name) {
            Ok(value) => value,
            Err(err) => panic!("reading '{name}' failed: {err}"),
        }
    }

    pub fn notebook(&mut self) -> &mut Notebook {
        &mut self.notebook
    }

    /// Assert that a name reads as an expected value
    pub fn assert_eq(&mut self, name: &str, expected: Value) {
        let actual = self.read(name);
        assert_eq!(
            actual, expected,
            "'{}' expected {:?} but got {:?}",
            name, expected, actual
        );
    }

    /// Assert exactly which cells the last pass ran, in order
    pub fn assert_evaluated(&self, expected: &[&str]) {
        let Some(report) = &self.last else {
            panic!("no pass has run yet");
        };
        assert_eq!(
            report.evaluated, expected,
            "pass {} ran {:?}, expected {:?}",
            report.pass, report.evaluated, expected
        );
    }

    pub fn assert_eval_count(&self, cell: &str, expected: u64) {
        let actual = self.notebook.runtime().eval_count(cell).unwrap_or(0);
        assert_eq!(
            actual, expected,
            "'{}' evaluated {} time(s), expected {}",
            cell, actual, expected
        );
    }

    pub fn assert_state(&self, cell: &str, expected: CellState) {
        let actual = self.notebook.runtime().status(cell);
        assert_eq!(actual, Ok(expected), "state of '{cell}'");
    }
}

impl Default for TestNotebook {
    fn default() -> Self {
        Self::new()
    }
}
