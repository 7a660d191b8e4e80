//! The smoothing notebook as a cell graph.
//!
//! ```text
//! synthetic_data ──x,y──> smoothing ──df,window──> plot
//! smoothing_slider ─────>     │
//!                             └──window──> commentary
//! data_flow_summary (no inputs)
//! ```

use crate::config::NotebookConfig;
use crate::data::{self, X, Y};
use crate::present::{self, SmoothingBand};
use crate::smoothing;
use cellflow::{
    CellSpec, ConstructionError, ControlSpec, Error, Figure, Graph, PassReport, Result, Runtime,
    Table, Value, smallvec,
};
use std::sync::Arc;

/// Node names
pub mod cells {
    pub const SLIDER: &str = "smoothing_slider";
    pub const DATA: &str = "synthetic_data";
    pub const SMOOTHING: &str = "smoothing";
    pub const PLOT: &str = "plot";
    pub const COMMENTARY: &str = "commentary";
    pub const SUMMARY: &str = "data_flow_summary";
}

/// Output names
pub mod outputs {
    pub const DF: &str = "df";
    pub const WINDOW: &str = "window";
    pub const FIGURE: &str = "figure";
    pub const MSG: &str = "msg";
    pub const SUMMARY: &str = "summary";
}

pub fn build_graph(config: &NotebookConfig) -> std::result::Result<Graph, ConstructionError> {
    let seed = config.seed;
    let params = config.data.clone();

    Graph::builder()
        .cell(
            CellSpec::new(cells::DATA)
                .outputs([X, Y])
                .body(move |_| {
                    let mut values = data::generate_with(seed, &params);
                    let x = values
                        .shift_remove(X)
                        .ok_or_else(|| Error::UnknownName(X.to_string()))?;
                    let y = values
                        .shift_remove(Y)
                        .ok_or_else(|| Error::UnknownName(Y.to_string()))?;
                    Ok(smallvec![x, y])
                }),
        )
        .control(
            ControlSpec::new(cells::SLIDER, config.slider.domain(), config.slider.initial)
                .label(config.slider.label.clone()),
        )
        .cell(
            CellSpec::new(cells::SMOOTHING)
                .inputs([X, Y, cells::SLIDER])
                .outputs([outputs::DF, outputs::WINDOW])
                .body(|inputs| {
                    let window = inputs.int(cells::SLIDER)?;
                    let table = smoothing::smooth(inputs.series(X)?, inputs.series(Y)?, window)?;
                    Ok(smallvec![Value::table(table), Value::int(window)])
                }),
        )
        .cell(
            CellSpec::new(cells::PLOT)
                .inputs([outputs::DF, outputs::WINDOW])
                .outputs([outputs::FIGURE])
                .body(|inputs| {
                    let df = inputs.table(outputs::DF)?;
                    let figure = present::plot_figure(df, inputs.int(outputs::WINDOW)?)?;
                    Ok(smallvec![Value::figure(figure)])
                }),
        )
        .cell(
            CellSpec::new(cells::COMMENTARY)
                .inputs([outputs::WINDOW])
                .outputs([outputs::MSG])
                .body(|inputs| {
                    let band = SmoothingBand::for_window(inputs.int(outputs::WINDOW)?);
                    Ok(smallvec![Value::markdown(band.message())])
                }),
        )
        .cell(
            CellSpec::new(cells::SUMMARY)
                .outputs([outputs::SUMMARY])
                .body(|_| Ok(smallvec![Value::markdown(present::DATA_FLOW_SUMMARY)])),
        )
        .build()
}

/// The notebook wrapper
pub struct Notebook {
    runtime: Runtime,
}

impl Notebook {
    pub fn new(config: &NotebookConfig) -> std::result::Result<Self, ConstructionError> {
        Ok(Self {
            runtime: Runtime::new(build_graph(config)?),
        })
    }

    /// Run every cell once, like opening the notebook
    pub fn run_all(&mut self) -> PassReport {
        self.runtime.evaluate_all()
    }

    /// Move the slider; re-runs the cells downstream of it
    pub fn set_window(&mut self, window: i64) -> Result<PassReport> {
        self.runtime.write(cells::SLIDER, window)
    }

    pub fn window(&self) -> Result<i64> {
        self.runtime.control_value(cells::SLIDER)
    }

    pub fn band(&self) -> Result<SmoothingBand> {
        self.window().map(SmoothingBand::for_window)
    }

    pub fn table(&mut self) -> Result<Arc<Table>> {
        match self.runtime.read(outputs::DF)? {
            Value::Table(table) => Ok(table),
            other => Err(mismatch(outputs::DF, "table", &other)),
        }
    }

    pub fn figure(&mut self) -> Result<Arc<Figure>> {
        match self.runtime.read(outputs::FIGURE)? {
            Value::Figure(figure) => Ok(figure),
            other => Err(mismatch(outputs::FIGURE, "figure", &other)),
        }
    }

    pub fn commentary(&mut self) -> Result<Arc<str>> {
        self.markdown(outputs::MSG)
    }

    pub fn summary(&mut self) -> Result<Arc<str>> {
        self.markdown(outputs::SUMMARY)
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn runtime_mut(&mut self) -> &mut Runtime {
        &mut self.runtime
    }

    fn markdown(&mut self, name: &str) -> Result<Arc<str>> {
        match self.runtime.read(name)? {
            Value::Markdown(text) => Ok(text),
            other => Err(mismatch(name, "markdown", &other)),
        }
    }
}

fn mismatch(name: &str, expected: &'static str, found: &Value) -> Error {
    Error::TypeMismatch {
        name: name.to_string(),
        expected,
        found: found.type_name(),
    }
}
