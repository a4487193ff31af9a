//! Weight drift between current holdings and target weights

use barn_core::{AllocationWeights, Token};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default drift a holding may have before a trade is emitted
pub const DEFAULT_REBALANCE_THRESHOLD: f64 = 0.01;

/// A holding whose weight drifted past the threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drift {
    pub token: Token,
    pub current_weight: f64,
    pub target_weight: f64,
    pub current_value: f64,
    pub target_value: f64,
}

impl Drift {
    /// Value to buy (positive) or sell (negative)
    pub fn delta_value(&self) -> f64 {
        self.target_value - self.current_value
    }
}

/// Holdings whose `|current_weight - target_weight|` strictly exceeds
/// `threshold`
///
/// Tokens missing from `target` have a target weight of 0. Nothing drifts
/// when the total value is not positive.
pub fn drifts(
    values: &BTreeMap<Token, f64>,
    target: &AllocationWeights,
    threshold: f64,
) -> Vec<Drift> {
    let total: f64 = values.values().sum();
    if total <= 0.0 {
        return Vec::new();
    }

    values
        .iter()
        .filter_map(|(token, &current_value)| {
            let current_weight = current_value / total;
            let target_weight = target.weight(token);

            if (current_weight - target_weight).abs() > threshold {
                Some(Drift {
                    token: token.clone(),
                    current_weight,
                    target_weight,
                    current_value,
                    target_value: total * target_weight,
                })
            } else {
                None
            }
        })
        .collect()
}
