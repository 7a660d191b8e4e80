//! End-to-end behavior of the smoothing notebook

use cellflow::{CellState, Error, SeriesKind, Value};
use cellflow_notebook::data::{self, X, Y};
use cellflow_notebook::present::{PLOT_TITLE, RAW_LABEL, smoothed_label};
use cellflow_notebook::smoothing::{SMOOTHED_COLUMN, rolling_mean};
use cellflow_notebook::test_harness::TestNotebook;
use cellflow_notebook::{NotebookConfig, SmoothingBand, cells, outputs};

const ALL_CELLS: [&str; 5] = [
    cells::DATA,
    cells::SUMMARY,
    cells::SMOOTHING,
    cells::PLOT,
    cells::COMMENTARY,
];

const SLIDER_DOWNSTREAM: [&str; 3] = [cells::SMOOTHING, cells::PLOT, cells::COMMENTARY];

#[test]
fn opening_runs_every_cell_once() {
    let mut nb = TestNotebook::new();
    nb.run_all();
    nb.assert_evaluated(&ALL_CELLS);
    for cell in ALL_CELLS {
        nb.assert_eval_count(cell, 1);
        nb.assert_state(cell, CellState::Valid);
    }

    // Nothing is pending, so a second run does no work
    nb.run_all();
    nb.assert_evaluated(&[]);
}

#[test]
fn initial_window_is_one() {
    let mut nb = TestNotebook::new();
    nb.run_all();
    nb.assert_eq(outputs::WINDOW, Value::int(1));
    assert_eq!(nb.notebook().band().unwrap(), SmoothingBand::Fine);

    // Window 1 leaves the data as is
    let table = nb.notebook().table().unwrap();
    assert_eq!(table.column(SMOOTHED_COLUMN), table.column(Y));
}

#[test]
fn fresh_notebook_reports_the_initial_window() {
    let mut nb = TestNotebook::new();
    assert_eq!(nb.notebook().window().unwrap(), 1);
    assert_eq!(nb.notebook().band().unwrap(), SmoothingBand::Fine);
}

#[test]
fn moving_the_slider_reruns_only_its_dependents() {
    let mut nb = TestNotebook::new();
    nb.run_all();
    let data_before = nb.read(Y);
    let summary_before = nb.read(outputs::SUMMARY);

    nb.set_window(7);
    nb.assert_evaluated(&SLIDER_DOWNSTREAM);
    for cell in SLIDER_DOWNSTREAM {
        nb.assert_eval_count(cell, 2);
    }
    nb.assert_eval_count(cells::DATA, 1);
    nb.assert_eval_count(cells::SUMMARY, 1);

    assert!(nb.read(Y).ptr_eq(&data_before));
    assert!(nb.read(outputs::SUMMARY).ptr_eq(&summary_before));
}

#[test]
fn smoothed_column_tracks_the_window() {
    let mut nb = TestNotebook::new();
    nb.run_all();
    let y = data::generate(NotebookConfig::default().seed)[Y]
        .as_series()
        .unwrap()
        .to_vec();

    for window in [3, 12, 20] {
        nb.set_window(window);
        let table = nb.notebook().table().unwrap();
        assert_eq!(
            table.column(SMOOTHED_COLUMN).unwrap(),
            rolling_mean(&y, window).unwrap().as_slice()
        );
        assert_eq!(table.len(), 100);
    }
}

#[test]
fn commentary_follows_the_bands() {
    let mut nb = TestNotebook::new();
    nb.run_all();
    let expected = [
        (4, SmoothingBand::Fine),
        (5, SmoothingBand::Moderate),
        (11, SmoothingBand::Moderate),
        (12, SmoothingBand::Heavy),
        (1, SmoothingBand::Fine),
    ];
    for (window, band) in expected {
        nb.set_window(window);
        assert_eq!(&*nb.notebook().commentary().unwrap(), band.message(), "window {window}");
    }
}

#[test]
fn figure_overlays_raw_points_and_smoothed_line() {
    let mut nb = TestNotebook::new();
    nb.run_all();
    nb.set_window(6);

    let figure = nb.notebook().figure().unwrap();
    assert_eq!(figure.title, PLOT_TITLE);
    let raw = figure.series_by_label(RAW_LABEL).unwrap();
    assert_eq!(raw.kind, SeriesKind::Scatter);
    let smoothed = figure.series_by_label(&smoothed_label(6)).unwrap();
    assert_eq!(smoothed.kind, SeriesKind::Line);
    assert_eq!(smoothed.x.len(), raw.x.len());

    // The raw series is the generated data, shared rather than copied
    let x = nb.read(X);
    assert!(std::sync::Arc::ptr_eq(&raw.x, x.as_series().unwrap()));
}

#[test]
fn out_of_range_windows_are_rejected() {
    let mut nb = TestNotebook::new();
    nb.run_all();
    nb.set_window(9);
    let stamp = nb.notebook().runtime().stamp(cells::SLIDER).unwrap();
    let figure = nb.read(outputs::FIGURE);

    for window in [0, 21, 25, -1] {
        let err = nb.notebook().set_window(window).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { value, .. } if value == window));
    }

    assert_eq!(nb.notebook().window().unwrap(), 9);
    assert_eq!(nb.notebook().runtime().stamp(cells::SLIDER).unwrap(), stamp);
    for cell in SLIDER_DOWNSTREAM {
        nb.assert_eval_count(cell, 2);
    }
    assert!(nb.read(outputs::FIGURE).ptr_eq(&figure));
}

#[test]
fn repeated_reads_return_the_cached_object() {
    let mut nb = TestNotebook::new();
    nb.run_all();
    for name in [outputs::DF, outputs::FIGURE, outputs::MSG, outputs::SUMMARY, X, Y] {
        let first = nb.read(name);
        let second = nb.read(name);
        assert!(first.ptr_eq(&second), "'{name}' was rebuilt");
    }
    for cell in ALL_CELLS {
        nb.assert_eval_count(cell, 1);
    }
}

#[test]
fn reading_one_output_evaluates_only_its_ancestors() {
    let mut nb = TestNotebook::new();
    let msg = nb.notebook().commentary().unwrap();
    assert_eq!(&*msg, SmoothingBand::Fine.message());

    nb.assert_state(cells::DATA, CellState::Valid);
    nb.assert_state(cells::SMOOTHING, CellState::Valid);
    nb.assert_state(cells::COMMENTARY, CellState::Valid);
    nb.assert_state(cells::PLOT, CellState::Unevaluated);
    nb.assert_state(cells::SUMMARY, CellState::Unevaluated);
}

#[test]
fn same_seed_same_notebook() {
    let mut first = TestNotebook::new();
    let mut second = TestNotebook::new();
    first.set_window(8);
    second.set_window(8);
    assert_eq!(
        first.notebook().table().unwrap(),
        second.notebook().table().unwrap()
    );
}

#[test]
fn configured_slider_bounds_apply() {
    let config = NotebookConfig::from_toml_str("[slider]\nmax = 30\ninitial = 3\n").unwrap();
    let mut nb = TestNotebook::with_config(&config);
    nb.assert_eq(cells::SLIDER, Value::int(3));
    nb.set_window(30);
    assert_eq!(&*nb.notebook().commentary().unwrap(), SmoothingBand::Heavy.message());
}

#[test]
fn summary_names_every_cell() {
    let mut nb = TestNotebook::new();
    let summary = nb.notebook().summary().unwrap();
    for cell in [cells::DATA, cells::SLIDER, cells::SMOOTHING, cells::PLOT, cells::COMMENTARY] {
        assert!(summary.contains(cell), "summary misses {cell}");
    }
}

#[test]
fn demo_config_matches_the_defaults() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/notebook.toml");
    assert_eq!(NotebookConfig::load(&path).unwrap(), NotebookConfig::default());
}
