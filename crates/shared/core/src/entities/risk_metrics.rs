use crate::values::{Timestamp, Token};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Risk measurements for one token at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    pub token: Token,
    /// Standard deviation of returns
    pub volatility: f64,
    /// Value at risk (a return quantile, usually negative)
    pub var: f64,
    /// Mean of the returns beyond the VaR quantile
    pub expected_shortfall: f64,
    /// Liquidity score (0.0 = illiquid, 1.0 = fully liquid)
    pub liquidity_score: f64,
    pub timestamp: Timestamp,
}

impl RiskMetrics {
    /// Create metrics stamped with the current time
    pub fn new(
        token: impl Into<Token>,
        volatility: f64,
        var: f64,
        expected_shortfall: f64,
        liquidity_score: f64,
    ) -> Self {
        Self {
            token: token.into(),
            volatility,
            var,
            expected_shortfall,
            liquidity_score,
            timestamp: Utc::now(),
        }
    }

    /// Builder: Override the timestamp
    pub fn at(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = timestamp;
        self
    }
}
