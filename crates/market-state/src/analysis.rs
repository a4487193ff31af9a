//! Market Analysis stage
//!
//! Each incoming signal updates the aggregator, then three read-only
//! sub-tasks run concurrently over one shared snapshot:
//!
//! ```text
//!                    ┌─► risk factors       ─┐
//! signal ─► update ──┼─► token metrics      ─┼─► MarketAnalysis
//!          snapshot  └─► candidate signals  ─┘
//! ```
//!
//! The snapshot is taken before the tasks are spawned, so they never observe
//! a half-applied update.

use crate::aggregator::{MarketSnapshot, MarketStateAggregator, TokenSnapshot};
use crate::config::MarketStateConfig;
use crate::error::{Error, Result};
use crate::scorer::{CandidateSignal, RiskFactors, RiskScorer};
use barn_core::{MarketSignal, Timestamp, Token};
use chrono::Utc;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::task::JoinError;

/// Latest state of one token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenMetrics {
    pub current_price: f64,
    pub current_volume: f64,
    /// `volume * price / base_liquidity`
    pub market_impact: f64,
    pub indicators: BTreeMap<String, f64>,
}

/// Joined result of the three analysis sub-tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketAnalysis {
    pub risk_factors: BTreeMap<Token, RiskFactors>,
    pub token_metrics: BTreeMap<Token, TokenMetrics>,
    pub trading_signals: Vec<CandidateSignal>,
    pub timestamp: Timestamp,
}

impl MarketAnalysis {
    /// Risk score of a token, if it has any history
    pub fn risk_score(&self, token: &str) -> Option<f64> {
        self.risk_factors.get(token).map(|f| f.risk_score)
    }
}

fn token_metrics(snapshot: &MarketSnapshot, base_liquidity: f64) -> BTreeMap<Token, TokenMetrics> {
    snapshot
        .tokens()
        .filter_map(|token| {
            let latest = snapshot.latest(token)?;
            let market_impact = if base_liquidity > 0.0 {
                latest.volume * latest.price / base_liquidity
            } else {
                0.0
            };
            Some((
                token.clone(),
                TokenMetrics {
                    current_price: latest.price,
                    current_volume: latest.volume,
                    market_impact,
                    indicators: latest.indicators.clone(),
                },
            ))
        })
        .collect()
}

fn task_error(err: JoinError) -> Error {
    Error::AnalysisTask(err.to_string())
}

/// Owns the market state and runs the analysis stage
#[derive(Debug, Clone)]
pub struct MarketAnalyzer {
    config: MarketStateConfig,
    aggregator: MarketStateAggregator,
    scorer: RiskScorer,
}

impl MarketAnalyzer {
    pub fn new(config: MarketStateConfig) -> Self {
        Self {
            aggregator: MarketStateAggregator::new(config.window_size),
            scorer: RiskScorer::new(config.scorer.clone()),
            config,
        }
    }

    pub fn config(&self) -> &MarketStateConfig {
        &self.config
    }

    pub fn aggregator(&self) -> &MarketStateAggregator {
        &self.aggregator
    }

    pub fn snapshot(&self, token: &str) -> TokenSnapshot {
        self.aggregator.snapshot(token)
    }

    /// Record the signal and analyze the updated market state
    pub async fn process_signal(&mut self, signal: &MarketSignal) -> Result<MarketAnalysis> {
        self.aggregator.update(signal);
        self.analyze().await
    }

    /// Run the three sub-tasks over the current state
    pub async fn analyze(&self) -> Result<MarketAnalysis> {
        let snapshot = Arc::new(self.aggregator.snapshot_all());
        let base_liquidity = self.config.base_liquidity;

        let risk_task = {
            let snapshot = Arc::clone(&snapshot);
            let scorer = self.scorer.clone();
            tokio::spawn(async move { scorer.risk_factors(&snapshot) })
        };
        let metrics_task = {
            let snapshot = Arc::clone(&snapshot);
            tokio::spawn(async move { token_metrics(&snapshot, base_liquidity) })
        };
        let signals_task = {
            let snapshot = Arc::clone(&snapshot);
            let scorer = self.scorer.clone();
            tokio::spawn(async move { scorer.candidates(&snapshot) })
        };

        let (risk_factors, token_metrics, trading_signals) = tokio::try_join!(
            async { risk_task.await.map_err(task_error) },
            async { metrics_task.await.map_err(task_error) },
            async { signals_task.await.map_err(task_error) },
        )?;

        debug!(
            "[MARKET] analysis: {} tokens scored, {} candidates",
            risk_factors.len(),
            trading_signals.len()
        );

        Ok(MarketAnalysis {
            risk_factors,
            token_metrics,
            trading_signals,
            timestamp: Utc::now(),
        })
    }
}

impl Default for MarketAnalyzer {
    fn default() -> Self {
        Self::new(MarketStateConfig::default())
    }
}
