//! Risk Manager Parameters
//!
//! Weights of the composite risk score and the history window.

use serde::{Deserialize, Serialize};

/// Weights of the four normalized composite risk components
///
/// The weights are applied as given; they are not required to sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeRiskWeights {
    /// Weight of `min(volatility * 10, 1)`
    pub volatility: f64,
    /// Weight of `min(|var| * 5, 1)`
    pub var: f64,
    /// Weight of `min(|expected_shortfall| * 5, 1)`
    pub expected_shortfall: f64,
    /// Weight of `1 - liquidity_score`
    pub liquidity: f64,
}

impl Default for CompositeRiskWeights {
    fn default() -> Self {
        Self {
            volatility: 0.3,
            var: 0.3,
            expected_shortfall: 0.2,
            liquidity: 0.2,
        }
    }
}

/// Configuration for the Risk Manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskManagerConfig {
    /// Metrics older than this many days are evicted on update
    pub risk_window_days: i64,
    pub weights: CompositeRiskWeights,
}

impl Default for RiskManagerConfig {
    fn default() -> Self {
        Self {
            risk_window_days: 30,
            weights: CompositeRiskWeights::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: RiskManagerConfig =
            serde_json::from_str(r#"{"weights": {"liquidity": 0.5}}"#).unwrap();

        assert_eq!(config.risk_window_days, 30);
        assert_eq!(config.weights.volatility, 0.3);
        assert_eq!(config.weights.liquidity, 0.5);
    }
}
