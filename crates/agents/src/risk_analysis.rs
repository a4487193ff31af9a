//! Risk Analysis Agent
//!
//! Feeds each signal into the market state, runs the market analysis and
//! derives the token's risk measures:
//!
//! ```text
//! MarketSignal ──► MarketAnalyzer ──► risk score, candidates, token metrics
//!                        │
//!                        └──► price window ──► volatility, sharpe, VaR, ES, trend
//!                                                     │
//!                                      RiskMetrics ──► RiskManager ──► breach?
//! ```

use crate::agent::Agent;
use crate::error::Result;
use async_trait::async_trait;
use barn_core::{MarketSignal, RiskMetrics, Token};
use barn_market_state::{MarketAnalysis, MarketAnalyzer, MarketStateConfig};
use barn_risk_manager::{RiskBreach, RiskManager, RiskManagerConfig, RiskReport};
use barn_stats::{
    DEFAULT_CONFIDENCE, expected_shortfall, returns, sharpe_ratio, trend, value_at_risk, volatility,
};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for the Risk Analysis Agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskAnalysisConfig {
    pub market: MarketStateConfig,
    pub risk_manager: RiskManagerConfig,
    /// Per-period risk-free rate for the Sharpe ratio
    pub risk_free_rate: f64,
    /// VaR / expected shortfall confidence
    pub confidence: f64,
    /// Composite risk limits installed at construction
    pub risk_limits: BTreeMap<Token, f64>,
}

impl Default for RiskAnalysisConfig {
    fn default() -> Self {
        Self {
            market: MarketStateConfig::default(),
            risk_manager: RiskManagerConfig::default(),
            risk_free_rate: 0.01,
            confidence: DEFAULT_CONFIDENCE,
            risk_limits: BTreeMap::new(),
        }
    }
}

impl RiskAnalysisConfig {
    /// Builder: Add a composite risk limit
    pub fn with_risk_limit(mut self, token: impl Into<Token>, limit: f64) -> Self {
        self.risk_limits.insert(token.into(), limit);
        self
    }
}

/// Risk measures of the signal's token after one update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub token: Token,
    pub volatility: f64,
    pub sharpe_ratio: f64,
    pub value_at_risk: f64,
    pub expected_shortfall: f64,
    /// Slope of the price window
    pub price_trend: f64,
    /// `min(volume × price / base_liquidity, 1)`
    pub liquidity_score: f64,
    /// Market state risk score in [0, 1]
    pub risk_score: f64,
    /// Risk manager composite risk (not clamped)
    pub composite_risk: f64,
    pub breach: Option<RiskBreach>,
    pub market: MarketAnalysis,
}

pub struct RiskAnalysisAgent {
    name: String,
    config: RiskAnalysisConfig,
    analyzer: MarketAnalyzer,
    risk_manager: RiskManager,
    state: Option<MarketSignal>,
}

impl RiskAnalysisAgent {
    pub fn new(name: impl Into<String>, config: RiskAnalysisConfig) -> Self {
        let risk_manager = RiskManager::new(config.risk_manager.clone());
        Self::with_risk_manager(name, config, risk_manager)
    }

    /// Create an agent around a prepared risk manager (custom clock, limits)
    pub fn with_risk_manager(
        name: impl Into<String>,
        config: RiskAnalysisConfig,
        mut risk_manager: RiskManager,
    ) -> Self {
        for (token, limit) in &config.risk_limits {
            risk_manager.set_risk_limit(token, *limit);
        }

        Self {
            name: name.into(),
            analyzer: MarketAnalyzer::new(config.market.clone()),
            risk_manager,
            config,
            state: None,
        }
    }

    pub fn config(&self) -> &RiskAnalysisConfig {
        &self.config
    }

    pub fn analyzer(&self) -> &MarketAnalyzer {
        &self.analyzer
    }

    pub fn risk_manager(&self) -> &RiskManager {
        &self.risk_manager
    }

    pub fn risk_manager_mut(&mut self) -> &mut RiskManager {
        &mut self.risk_manager
    }

    pub fn risk_report(&self) -> RiskReport {
        self.risk_manager.risk_report()
    }

    fn liquidity_score(&self, signal: &MarketSignal) -> f64 {
        let base = self.config.market.base_liquidity;
        if base <= 0.0 {
            return 0.0;
        }
        (signal.volume * signal.price / base).clamp(0.0, 1.0)
    }
}

#[async_trait]
impl Agent for RiskAnalysisAgent {
    type Input = MarketSignal;
    type Output = RiskAssessment;

    fn name(&self) -> &str {
        &self.name
    }

    fn update_state(&mut self, input: MarketSignal) {
        self.state = Some(input);
    }

    fn take_state(&mut self) -> Option<MarketSignal> {
        self.state.take()
    }

    async fn process(&mut self, signal: MarketSignal) -> Result<RiskAssessment> {
        let market = self.analyzer.process_signal(&signal).await?;

        let token = signal.token.clone();
        let prices = self.analyzer.aggregator().prices(&token);
        let period_returns = returns(&prices).unwrap_or_default();

        let volatility = volatility(&prices);
        let sharpe_ratio = sharpe_ratio(&period_returns, self.config.risk_free_rate);
        let value_at_risk = value_at_risk(&prices, self.config.confidence);
        let expected_shortfall = expected_shortfall(&prices, self.config.confidence);
        let price_trend = trend(&prices);
        let liquidity_score = self.liquidity_score(&signal);
        let risk_score = market.risk_score(&token).unwrap_or(1.0);

        let metrics = RiskMetrics::new(
            token.clone(),
            volatility,
            value_at_risk,
            expected_shortfall,
            liquidity_score,
        )
        .at(signal.timestamp);
        let composite_risk = self.risk_manager.composite_risk(&metrics);
        self.risk_manager.update_metrics(metrics);
        let breach = self.risk_manager.check_breach(&token);

        info!(
            "[RISK] {} score={:.4} composite={:.4} vol={:.6} trend={:.4}",
            token, risk_score, composite_risk, volatility, price_trend
        );

        Ok(RiskAssessment {
            token,
            volatility,
            sharpe_ratio,
            value_at_risk,
            expected_shortfall,
            price_trend,
            liquidity_score,
            risk_score,
            composite_risk,
            breach,
            market,
        })
    }
}
