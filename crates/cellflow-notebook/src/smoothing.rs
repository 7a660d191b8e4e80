//! Trailing rolling mean.

use cellflow::{Error, Result, Table};
use std::sync::Arc;

/// Column names of the smoothed table
pub const X_COLUMN: &str = "x";
pub const Y_COLUMN: &str = "y";
pub const SMOOTHED_COLUMN: &str = "y_smoothed";

/// Mean of the trailing `window` values ending at each index.
///
/// The first `window - 1` entries average only the available prefix, so the
/// output has the input's length and no undefined entries.
pub fn rolling_mean(series: &[f64], window: i64) -> Result<Vec<f64>> {
    if window <= 0 {
        return Err(Error::invalid_parameter("window", window, "must be positive"));
    }
    let window = usize::try_from(window).unwrap_or(usize::MAX);

    Ok((0..series.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let values = &series[start..=i];
            values.iter().sum::<f64>() / values.len() as f64
        })
        .collect())
}

/// Table with the raw columns and their rolling mean.
///
/// The raw columns are shared with the inputs, not copied.
pub fn smooth(x: &Arc<Vec<f64>>, y: &Arc<Vec<f64>>, window: i64) -> Result<Table> {
    let smoothed = rolling_mean(y, window)?;
    Ok(Table::new()
        .with_column(X_COLUMN, Arc::clone(x))
        .with_column(Y_COLUMN, Arc::clone(y))
        .with_column(SMOOTHED_COLUMN, smoothed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_one_is_identity() {
        let series = vec![3.5, -1.25, 7.0, 0.1, 2.2];
        assert_eq!(rolling_mean(&series, 1).unwrap(), series);
    }

    #[test]
    fn prefix_is_averaged_while_window_fills() {
        let series = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(
            rolling_mean(&series, 3).unwrap(),
            vec![1.0, 1.5, 2.0, 3.0, 4.0]
        );
    }

    #[test]
    fn window_longer_than_series() {
        let series = vec![2.0, 4.0, 6.0];
        assert_eq!(rolling_mean(&series, 20).unwrap(), vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn length_is_preserved() {
        let series: Vec<f64> = (0..37).map(|i| i as f64 * 0.3).collect();
        for window in 1..=20 {
            assert_eq!(rolling_mean(&series, window).unwrap().len(), series.len());
        }
    }

    #[test]
    fn empty_series_is_not_an_error() {
        assert!(rolling_mean(&[], 4).unwrap().is_empty());
    }

    #[test]
    fn non_positive_window_is_rejected() {
        for window in [0, -3] {
            let err = rolling_mean(&[1.0], window).unwrap_err();
            assert!(matches!(err, Error::InvalidParameter { value, .. } if value == window));
        }
    }

    #[test]
    fn smooth_shares_raw_columns() {
        let x = Arc::new(vec![0.0, 1.0]);
        let y = Arc::new(vec![4.0, 8.0]);
        let table = smooth(&x, &y, 2).unwrap();
        assert!(Arc::ptr_eq(table.column_arc(Y_COLUMN).unwrap(), &y));
        assert_eq!(table.column(SMOOTHED_COLUMN), Some(&[4.0, 6.0][..]));
    }
}
