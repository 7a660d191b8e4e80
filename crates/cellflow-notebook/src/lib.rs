//! The data smoothing notebook on top of `cellflow`.
//!
//! A seeded synthetic dataset, a window-size slider, a rolling mean over the
//! data and two presentation cells: a plot of raw and smoothed values and a
//! one-line commentary on how strong the smoothing is.

pub mod config;
pub mod data;
pub mod notebook;
pub mod present;
pub mod smoothing;
pub mod test_harness;

pub use config::{ConfigError, NotebookConfig, SliderConfig};
pub use data::SyntheticParams;
pub use notebook::{Notebook, build_graph, cells, outputs};
pub use present::SmoothingBand;
