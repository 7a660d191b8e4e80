//! Values flowing along bindings.
//!
//! Aggregates are `Arc`-wrapped so that cloning a cached value is O(1)
//! and hands out the same underlying object.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A value produced by a control or a cell output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Unit,
    Int(i64),
    Float(f64),
    Text(Arc<str>),
    /// Markdown handed to an external renderer
    Markdown(Arc<str>),
    Series(Arc<Vec<f64>>),
    Table(Arc<Table>),
    Figure(Arc<Figure>),
}

impl Value {
    pub fn int(v: i64) -> Self {
        Value::Int(v)
    }

    pub fn float(v: f64) -> Self {
        Value::Float(v)
    }

    pub fn text(v: impl Into<String>) -> Self {
        Value::Text(v.into().into())
    }

    pub fn markdown(v: impl Into<String>) -> Self {
        Value::Markdown(v.into().into())
    }

    pub fn series(values: impl Into<Vec<f64>>) -> Self {
        Value::Series(Arc::new(values.into()))
    }

    pub fn table(table: Table) -> Self {
        Value::Table(Arc::new(table))
    }

    pub fn figure(figure: Figure) -> Self {
        Value::Figure(Arc::new(figure))
    }

    /// Name of the variant, used in type mismatch errors
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Unit => "unit",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Markdown(_) => "markdown",
            Value::Series(_) => "series",
            Value::Table(_) => "table",
            Value::Figure(_) => "figure",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Text or markdown content
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) | Value::Markdown(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_series(&self) -> Option<&Arc<Vec<f64>>> {
        match self {
            Value::Series(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Arc<Table>> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_figure(&self) -> Option<&Arc<Figure>> {
        match self {
            Value::Figure(f) => Some(f),
            _ => None,
        }
    }

    /// Identity comparison: true when both values share the same allocation.
    ///
    /// Scalars have no identity and compare by value.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Text(a), Value::Text(b)) | (Value::Markdown(a), Value::Markdown(b)) => {
                Arc::ptr_eq(a, b)
            }
            (Value::Series(a), Value::Series(b)) => Arc::ptr_eq(a, b),
            (Value::Table(a), Value::Table(b)) => Arc::ptr_eq(a, b),
            (Value::Figure(a), Value::Figure(b)) => Arc::ptr_eq(a, b),
            (Value::Unit, Value::Unit) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

/// Ordered named numeric columns.
///
/// All columns are expected to have the same length; `len` reports the
/// length of the first column.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    columns: IndexMap<String, Arc<Vec<f64>>>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a column, keeping insertion order
    pub fn with_column(mut self, name: impl Into<String>, values: impl Into<Arc<Vec<f64>>>) -> Self {
        self.columns.insert(name.into(), values.into());
        self
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(|c| c.as_slice())
    }

    /// Shared handle to a column, for building figures without copying
    pub fn column_arc(&self, name: &str) -> Option<&Arc<Vec<f64>>> {
        self.columns.get(name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.columns.values().next().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// How a series is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    Scatter,
    Line,
}

/// One plotted series of a figure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotSeries {
    pub kind: SeriesKind,
    pub label: String,
    pub x: Arc<Vec<f64>>,
    pub y: Arc<Vec<f64>>,
}

/// Description of a figure, handed to an external plotting library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub title: String,
    pub series: Vec<PlotSeries>,
}

impl Figure {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            series: Vec::new(),
        }
    }

    /// Overlay another series
    pub fn with_series(
        mut self,
        kind: SeriesKind,
        label: impl Into<String>,
        x: Arc<Vec<f64>>,
        y: Arc<Vec<f64>>,
    ) -> Self {
        self.series.push(PlotSeries {
            kind,
            label: label.into(),
            x,
            y,
        });
        self
    }

    pub fn series_by_label(&self, label: &str) -> Option<&PlotSeries> {
        self.series.iter().find(|s| s.label == label)
    }
}
