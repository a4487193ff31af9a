//! Trend and momentum of a series

use crate::series::mean;
use crate::{MOMENTUM_LONG_WINDOW, MOMENTUM_SHORT_WINDOW};

/// Slope of the ordinary-least-squares line through `(index, value)`
///
/// 0 for fewer than 2 points.
pub fn trend(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }

    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = values.iter().sum::<f64>() / n as f64;

    let (num, den) = values
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(num, den), (i, y)| {
            let dx = i as f64 - x_mean;
            (num + dx * (y - y_mean), den + dx * dx)
        });

    num / den
}

/// Mean of the last `min(5, n)` values minus the mean of the last
/// `min(20, n)` values. 0 for an empty series.
pub fn momentum(values: &[f64]) -> f64 {
    let n = values.len();
    let short = &values[n - MOMENTUM_SHORT_WINDOW.min(n)..];
    let long = &values[n - MOMENTUM_LONG_WINDOW.min(n)..];

    match (mean(short), mean(long)) {
        (Some(s), Some(l)) => s - l,
        _ => 0.0,
    }
}
