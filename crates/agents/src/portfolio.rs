//! Portfolio Management Agent
//!
//! Optimizes target weights over caller-supplied return series and emits
//! value-denominated rebalancing trades against the current allocation.

use crate::agent::Agent;
use crate::error::Result;
use async_trait::async_trait;
use barn_core::{AllocationWeights, RebalanceTrade, Token};
use barn_portfolio::{OptimizerConfig, ReturnMatrix, drifts, optimize_returns};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for the Portfolio Agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioAgentConfig {
    pub optimizer: OptimizerConfig,
}

impl Default for PortfolioAgentConfig {
    fn default() -> Self {
        Self {
            optimizer: OptimizerConfig::default()
                .with_risk_free_rate(0.01)
                .with_min_position_size(None),
        }
    }
}

/// Current allocation and the return history to optimize over
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioInput {
    /// Value held per token
    pub current_allocation: BTreeMap<Token, f64>,
    /// Return series per token; missing series count as flat
    #[serde(default)]
    pub historical_returns: BTreeMap<Token, Vec<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioUpdate {
    pub optimal_weights: AllocationWeights,
    /// Amounts are in value, not token units
    pub rebalancing_trades: Vec<RebalanceTrade>,
}

pub struct PortfolioAgent {
    name: String,
    config: PortfolioAgentConfig,
    state: Option<PortfolioInput>,
    /// Allocation seen by the last run
    allocation: BTreeMap<Token, f64>,
}

impl PortfolioAgent {
    pub fn new(name: impl Into<String>, config: PortfolioAgentConfig) -> Self {
        Self {
            name: name.into(),
            config,
            state: None,
            allocation: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &PortfolioAgentConfig {
        &self.config
    }

    pub fn allocation(&self) -> &BTreeMap<Token, f64> {
        &self.allocation
    }
}

#[async_trait]
impl Agent for PortfolioAgent {
    type Input = PortfolioInput;
    type Output = PortfolioUpdate;

    fn name(&self) -> &str {
        &self.name
    }

    fn update_state(&mut self, input: PortfolioInput) {
        self.state = Some(input);
    }

    fn take_state(&mut self) -> Option<PortfolioInput> {
        self.state.take()
    }

    async fn process(&mut self, input: PortfolioInput) -> Result<PortfolioUpdate> {
        let PortfolioInput {
            current_allocation,
            historical_returns,
        } = input;
        self.allocation = current_allocation;

        if self.allocation.is_empty() {
            return Ok(PortfolioUpdate::default());
        }

        let matrix = ReturnMatrix::from_returns(self.allocation.keys().map(|token| {
            let series = historical_returns.get(token).cloned().unwrap_or_default();
            (token.clone(), series)
        }));
        let optimal_weights = optimize_returns(&matrix, &self.config.optimizer)?;

        let rebalancing_trades: Vec<RebalanceTrade> = drifts(
            &self.allocation,
            &optimal_weights,
            self.config.optimizer.rebalance_threshold,
        )
        .into_iter()
        .map(|drift| RebalanceTrade::from_delta(drift.token.clone(), drift.delta_value()))
        .collect();

        info!(
            "[PORTFOLIO] {} tokens optimized, {} rebalancing trades",
            optimal_weights.len(),
            rebalancing_trades.len()
        );

        Ok(PortfolioUpdate {
            optimal_weights,
            rebalancing_trades,
        })
    }
}
