//! Risk report types

use barn_core::{Timestamp, Token};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Latest composite risk of a token exceeding its configured limit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskBreach {
    pub token: Token,
    pub level: f64,
    pub limit: f64,
    /// `level - limit`, always positive
    pub breach_amount: f64,
    pub timestamp: Timestamp,
}

/// Summary over the latest composite risk of every tracked token
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalRiskMetrics {
    pub average_risk: f64,
    pub max_risk: f64,
    /// Population standard deviation of the per-token risks
    pub risk_concentration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRiskMetrics {
    pub current_risk: f64,
    /// Slope of the volatility history
    pub volatility_trend: f64,
    /// Slope of the VaR history
    pub var_trend: f64,
    /// Momentum of the composite risk history
    pub momentum: f64,
    pub liquidity_score: f64,
    pub metrics_timestamp: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
}

/// Direction of a token's composite risk over its history
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "trend")]
pub enum TrendAnalysis {
    InsufficientData,
    Trend {
        direction: TrendDirection,
        strength: f64,
        momentum: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    pub timestamp: Timestamp,
    pub global: GlobalRiskMetrics,
    pub token_metrics: BTreeMap<Token, TokenRiskMetrics>,
    pub breaches: Vec<RiskBreach>,
    pub trend_analysis: BTreeMap<Token, TrendAnalysis>,
}
