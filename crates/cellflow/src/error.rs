//! Errors for graph construction and evaluation.

use thiserror::Error;

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type a cell body may return.
pub type BodyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by `GraphBuilder::build`, before anything is evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    #[error("node `{0}` is declared more than once")]
    DuplicateNode(String),

    #[error("output `{output}` is produced by both `{first}` and `{second}`")]
    DuplicateOutput {
        output: String,
        first: String,
        second: String,
    },

    #[error("cell `{cell}` declares input `{input}` more than once")]
    DuplicateInput { cell: String, input: String },

    #[error("cell `{cell}` reads `{input}`, which no node produces")]
    UnresolvedInput { cell: String, input: String },

    #[error("cycle detected between cells: {cells:?}")]
    Cycle { cells: Vec<String> },

    #[error("control `{control}` has an invalid domain [{min}, {max}] step {step}")]
    InvalidDomain {
        control: String,
        min: i64,
        max: i64,
        step: i64,
    },

    #[error("control `{control}` starts at {value}, outside [{min}, {max}] step {step}")]
    InitialOutOfRange {
        control: String,
        value: i64,
        min: i64,
        max: i64,
        step: i64,
    },
}

/// Runtime errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Construction(#[from] ConstructionError),

    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: String,
        value: i64,
        reason: String,
    },

    #[error("cell `{cell}` failed: {message}")]
    Computation { cell: String, message: String },

    #[error("cell `{cell}` cannot run: upstream `{upstream}` has no value")]
    UpstreamFailed { cell: String, upstream: String },

    #[error("no node produces `{0}`")]
    UnknownName(String),

    #[error("`{0}` is not a control")]
    NotAControl(String),

    #[error("expected {expected} for `{name}`, found {found}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl Error {
    /// Shorthand for a rejected parameter value.
    pub fn invalid_parameter(name: impl Into<String>, value: i64, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name: name.into(),
            value,
            reason: reason.into(),
        }
    }
}
