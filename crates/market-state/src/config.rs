//! Market state configuration

use crate::aggregator::DEFAULT_WINDOW_SIZE;
use serde::{Deserialize, Serialize};

/// Configuration for the composite risk scorer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskScorerConfig {
    /// Weight of the normalized price volatility component
    pub volatility_weight: f64,
    /// Weight of the volume trend stability component
    pub volume_trend_weight: f64,
    /// Tokens scoring below this are flagged as trading candidates
    pub risk_threshold: f64,
}

impl Default for RiskScorerConfig {
    fn default() -> Self {
        Self {
            volatility_weight: 0.7,
            volume_trend_weight: 0.3,
            risk_threshold: 0.7,
        }
    }
}

/// Configuration for the market state stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketStateConfig {
    /// Observations kept per token
    pub window_size: usize,
    /// Liquidity used to normalize market impact
    pub base_liquidity: f64,
    pub scorer: RiskScorerConfig,
}

impl Default for MarketStateConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            base_liquidity: 1_000_000.0,
            scorer: RiskScorerConfig::default(),
        }
    }
}

impl MarketStateConfig {
    /// Builder: Set the per-token window size
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Builder: Set the candidate risk threshold
    pub fn with_risk_threshold(mut self, threshold: f64) -> Self {
        self.scorer.risk_threshold = threshold;
        self
    }
}
