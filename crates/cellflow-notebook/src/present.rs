//! Presentation cells: the figure and the markdown text.

use crate::smoothing::{SMOOTHED_COLUMN, X_COLUMN, Y_COLUMN};
use cellflow::{Error, Figure, Result, SeriesKind, Table};
use serde::Serialize;

pub const PLOT_TITLE: &str = "Relationship Between x and y";
pub const RAW_LABEL: &str = "Raw Data";

/// How strongly the current window smooths the data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingBand {
    /// window < 5
    Fine,
    /// 5 <= window < 12
    Moderate,
    /// window >= 12
    Heavy,
}

impl SmoothingBand {
    pub const MODERATE_FROM: i64 = 5;
    pub const HEAVY_FROM: i64 = 12;

    pub fn for_window(window: i64) -> Self {
        if window < Self::MODERATE_FROM {
            SmoothingBand::Fine
        } else if window < Self::HEAVY_FROM {
            SmoothingBand::Moderate
        } else {
            SmoothingBand::Heavy
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            SmoothingBand::Fine => {
                "### 🔍 Fine smoothing applied: capturing local fluctuations."
            }
            SmoothingBand::Moderate => "### 📊 Moderate smoothing: balancing noise and trend.",
            SmoothingBand::Heavy => {
                "### 🧹 Heavy smoothing: trend is emphasized, noise suppressed."
            }
        }
    }
}

pub fn smoothed_label(window: i64) -> String {
    format!("Smoothed (window={window})")
}

/// Raw points as a scatter, the rolling mean as a line over them.
pub fn plot_figure(table: &Table, window: i64) -> Result<Figure> {
    let column = |name: &str| {
        table
            .column_arc(name)
            .cloned()
            .ok_or_else(|| Error::UnknownName(name.to_string()))
    };
    let x = column(X_COLUMN)?;

    Ok(Figure::new(PLOT_TITLE)
        .with_series(SeriesKind::Scatter, RAW_LABEL, x.clone(), column(Y_COLUMN)?)
        .with_series(
            SeriesKind::Line,
            smoothed_label(window),
            x,
            column(SMOOTHED_COLUMN)?,
        ))
}

pub const DATA_FLOW_SUMMARY: &str = "\
### Data Flow Summary

1. **synthetic_data** creates the linear dataset (`x`, `y`) from a fixed seed.
2. **smoothing_slider** holds the smoothing window size.
3. **smoothing** computes the rolling mean from `x`, `y` and the slider.
4. **plot** overlays the raw points and the smoothed curve.
5. **commentary** describes the current smoothing level.

Moving the slider re-runs steps 3 to 5 only.
";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smoothing::smooth;
    use std::sync::Arc;

    #[test]
    fn bands_partition_the_slider_range() {
        let expected = [
            (1, SmoothingBand::Fine),
            (4, SmoothingBand::Fine),
            (5, SmoothingBand::Moderate),
            (11, SmoothingBand::Moderate),
            (12, SmoothingBand::Heavy),
            (20, SmoothingBand::Heavy),
        ];
        for (window, band) in expected {
            assert_eq!(SmoothingBand::for_window(window), band, "window {window}");
        }

        let changes: Vec<i64> = (2..=20)
            .filter(|&w| SmoothingBand::for_window(w) != SmoothingBand::for_window(w - 1))
            .collect();
        assert_eq!(changes, vec![5, 12]);
    }

    #[test]
    fn messages_are_distinct_headings() {
        let messages = [
            SmoothingBand::Fine.message(),
            SmoothingBand::Moderate.message(),
            SmoothingBand::Heavy.message(),
        ];
        for message in messages {
            assert!(message.starts_with("### "));
        }
        assert_ne!(messages[0], messages[1]);
        assert_ne!(messages[1], messages[2]);
    }

    #[test]
    fn figure_overlays_raw_and_smoothed() {
        let x = Arc::new(vec![0.0, 1.0, 2.0]);
        let y = Arc::new(vec![3.0, 5.0, 7.0]);
        let table = smooth(&x, &y, 2).unwrap();

        let figure = plot_figure(&table, 2).unwrap();
        assert_eq!(figure.title, PLOT_TITLE);
        assert_eq!(figure.series.len(), 2);

        let raw = figure.series_by_label(RAW_LABEL).unwrap();
        assert_eq!(raw.kind, SeriesKind::Scatter);
        assert!(Arc::ptr_eq(&raw.y, &y));

        let smoothed = figure.series_by_label("Smoothed (window=2)").unwrap();
        assert_eq!(smoothed.kind, SeriesKind::Line);
        assert_eq!(smoothed.y.as_slice(), &[3.0, 4.0, 6.0]);
    }

    #[test]
    fn figure_needs_all_columns() {
        let table = Table::new().with_column(X_COLUMN, vec![0.0]);
        assert!(matches!(plot_figure(&table, 1), Err(Error::UnknownName(_))));
    }
}
