//! Return series, moments and the Sharpe-style ratio

use crate::error::{StatsError, StatsResult};

/// Simple period-over-period returns: `(p[i] - p[i-1]) / p[i-1]`
///
/// A step from a zero price has no defined relative change and is reported
/// as a zero return.
pub fn returns(prices: &[f64]) -> StatsResult<Vec<f64>> {
    if prices.len() < 2 {
        return Err(StatsError::InsufficientData {
            required: 2,
            actual: prices.len(),
        });
    }

    Ok(prices
        .windows(2)
        .map(|w| {
            if w[0] == 0.0 {
                0.0
            } else {
                (w[1] - w[0]) / w[0]
            }
        })
        .collect())
}

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (divides by n), 0 for an empty slice
pub fn std_dev(values: &[f64]) -> f64 {
    let Some(m) = mean(values) else {
        return 0.0;
    };
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

/// Standard deviation of the return series, 0 for fewer than 2 points
pub fn volatility(prices: &[f64]) -> f64 {
    returns(prices).map(|r| std_dev(&r)).unwrap_or(0.0)
}

/// Mean excess return over its standard deviation
///
/// Returns 0 when the series is empty or has no dispersion.
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64) -> f64 {
    let excess: Vec<f64> = returns.iter().map(|r| r - risk_free_rate).collect();
    let sd = std_dev(&excess);
    match mean(&excess) {
        Some(m) if sd > 0.0 => m / sd,
        _ => 0.0,
    }
}
