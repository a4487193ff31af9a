//! Tail-risk measures on the return distribution

use crate::series::{mean, returns};

/// The `q`-quantile of `values` using linear interpolation between order
/// statistics (position `q * (n - 1)` in the sorted series).
///
/// `q` is clamped to [0, 1]. Returns `None` for an empty slice.
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;

    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Value at risk: the `(1 - confidence)`-quantile of the return series
///
/// 0 for fewer than 2 prices.
pub fn value_at_risk(prices: &[f64], confidence: f64) -> f64 {
    returns(prices)
        .ok()
        .and_then(|r| percentile(&r, 1.0 - confidence))
        .unwrap_or(0.0)
}

/// Expected shortfall: mean of the returns at or below the VaR quantile
///
/// 0 for fewer than 2 prices.
pub fn expected_shortfall(prices: &[f64], confidence: f64) -> f64 {
    let Ok(r) = returns(prices) else {
        return 0.0;
    };
    let Some(var) = percentile(&r, 1.0 - confidence) else {
        return 0.0;
    };

    let tail: Vec<f64> = r.iter().copied().filter(|x| *x <= var).collect();
    mean(&tail).unwrap_or(var)
}
