//! Composite Risk Scorer
//!
//! ```text
//! risk = w_vol * min(volatility(prices) * 10, 1)
//!      + w_trend * (1 - |clamp(trend(volumes), -1, 1)|)
//! ```
//!
//! The result is clamped to [0, 1]. A non-finite score (overflowing inputs)
//! is treated as maximum risk.

use crate::aggregator::MarketSnapshot;
use crate::config::RiskScorerConfig;
use barn_core::{Timestamp, Token};
use barn_stats::{trend, volatility};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-token inputs and output of the risk score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskFactors {
    pub price_volatility: f64,
    pub volume_trend: f64,
    pub risk_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CandidateAction {
    /// Risk is low enough to warrant a closer look
    Analyze,
}

/// A token flagged for further analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSignal {
    pub token: Token,
    pub action: CandidateAction,
    /// `1 - risk_score`
    pub confidence: f64,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, Default)]
pub struct RiskScorer {
    config: RiskScorerConfig,
}

impl RiskScorer {
    pub fn new(config: RiskScorerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RiskScorerConfig {
        &self.config
    }

    /// Score one price/volume history
    pub fn score(&self, prices: &[f64], volumes: &[f64]) -> RiskFactors {
        let price_volatility = volatility(prices);
        let volume_trend = trend(volumes);

        let vol_component = (price_volatility * 10.0).min(1.0);
        let trend_component = 1.0 - volume_trend.clamp(-1.0, 1.0).abs();

        let raw = self.config.volatility_weight * vol_component
            + self.config.volume_trend_weight * trend_component;

        let risk_score = if raw.is_finite() {
            raw.clamp(0.0, 1.0)
        } else {
            1.0
        };

        RiskFactors {
            price_volatility,
            volume_trend,
            risk_score,
        }
    }

    /// Score every token with at least one observation
    pub fn risk_factors(&self, snapshot: &MarketSnapshot) -> BTreeMap<Token, RiskFactors> {
        snapshot
            .tokens()
            .map(|token| {
                let factors = self.score(&snapshot.prices(token), &snapshot.volumes(token));
                (token.clone(), factors)
            })
            .collect()
    }

    /// Tokens whose risk score is strictly below the threshold
    pub fn candidates(&self, snapshot: &MarketSnapshot) -> Vec<CandidateSignal> {
        let now = Utc::now();
        self.risk_factors(snapshot)
            .into_iter()
            .filter(|(_, f)| f.risk_score < self.config.risk_threshold)
            .map(|(token, f)| CandidateSignal {
                token,
                action: CandidateAction::Analyze,
                confidence: 1.0 - f.risk_score,
                timestamp: now,
            })
            .collect()
    }
}
