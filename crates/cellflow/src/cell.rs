//! Cell declarations.
//!
//! A cell is a pure function from its declared inputs to its declared
//! outputs. Names are wired by exact match when the graph is built.

use crate::error::{BodyError, Error, Result};
use crate::value::{Table, Value};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// Values returned by a cell body, one per declared output
pub type Outputs = SmallVec<[Value; 2]>;

/// A cell body
pub type Body = Box<dyn Fn(&Inputs<'_>) -> std::result::Result<Outputs, BodyError>>;

/// Lifecycle of a cell in the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellState {
    Unevaluated,
    Valid,
    Stale,
    /// The last evaluation attempt returned an error
    Failed,
}

/// Declaration of a cell, consumed by the graph builder
pub struct CellSpec {
    pub(crate) name: String,
    pub(crate) inputs: Vec<String>,
    pub(crate) outputs: Vec<String>,
    pub(crate) body: Body,
}

impl CellSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            body: Box::new(|_| Ok(Outputs::new())),
        }
    }

    pub fn inputs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn outputs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outputs = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn body<F>(mut self, body: F) -> Self
    where
        F: Fn(&Inputs<'_>) -> std::result::Result<Outputs, BodyError> + 'static,
    {
        self.body = Box::new(body);
        self
    }
}

impl fmt::Debug for CellSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellSpec")
            .field("name", &self.name)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .finish_non_exhaustive()
    }
}

/// Resolved input values for one evaluation, in declaration order
pub struct Inputs<'a> {
    names: &'a [String],
    values: &'a [Value],
}

impl<'a> Inputs<'a> {
    pub(crate) fn new(names: &'a [String], values: &'a [Value]) -> Self {
        debug_assert_eq!(names.len(), values.len());
        Self { names, values }
    }

    pub fn get(&self, name: &str) -> Result<&'a Value> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.values[i])
            .ok_or_else(|| Error::UnknownName(name.to_string()))
    }

    pub fn int(&self, name: &str) -> Result<i64> {
        let value = self.get(name)?;
        value.as_int().ok_or_else(|| mismatch(name, "int", value))
    }

    pub fn float(&self, name: &str) -> Result<f64> {
        let value = self.get(name)?;
        value.as_float().ok_or_else(|| mismatch(name, "float", value))
    }

    pub fn series(&self, name: &str) -> Result<&'a Arc<Vec<f64>>> {
        let value = self.get(name)?;
        value.as_series().ok_or_else(|| mismatch(name, "series", value))
    }

    pub fn table(&self, name: &str) -> Result<&'a Arc<Table>> {
        let value = self.get(name)?;
        value.as_table().ok_or_else(|| mismatch(name, "table", value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a Value)> + use<'a> {
        self.names.iter().map(String::as_str).zip(self.values.iter())
    }
}

fn mismatch(name: &str, expected: &'static str, found: &Value) -> Error {
    Error::TypeMismatch {
        name: name.to_string(),
        expected,
        found: found.type_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_accessors() {
        let names = vec!["window".to_string(), "y".to_string()];
        let values = vec![Value::int(3), Value::series(vec![1.0])];
        let inputs = Inputs::new(&names, &values);

        assert_eq!(inputs.int("window").unwrap(), 3);
        assert_eq!(inputs.series("y").unwrap().as_slice(), &[1.0]);
        assert!(matches!(
            inputs.int("y"),
            Err(Error::TypeMismatch { expected: "int", found: "series", .. })
        ));
        assert!(matches!(inputs.get("z"), Err(Error::UnknownName(_))));
    }
}
