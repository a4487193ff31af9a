//! Agent Trait
//!
//! Every decision agent consumes one typed input and produces one typed
//! output. The input is staged with `update_state` and consumed by `run`,
//! so a second `run` without fresh state fails instead of replaying stale
//! data.

use crate::error::{Error, Result};
use async_trait::async_trait;
use barn_core::{MarketSignal, Token};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything the pipeline knows about one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketData {
    pub signal: MarketSignal,
    /// Current value held per token
    #[serde(default)]
    pub portfolio: BTreeMap<Token, f64>,
    /// Return series per token
    #[serde(default)]
    pub historical_returns: BTreeMap<Token, Vec<f64>>,
}

impl MarketData {
    pub fn new(signal: MarketSignal) -> Self {
        Self {
            signal,
            portfolio: BTreeMap::new(),
            historical_returns: BTreeMap::new(),
        }
    }

    /// Builder: Add a holding valued at `value`
    pub fn with_holding(mut self, token: impl Into<Token>, value: f64) -> Self {
        self.portfolio.insert(token.into(), value);
        self
    }

    /// Builder: Add a token's return series
    pub fn with_returns(mut self, token: impl Into<Token>, returns: Vec<f64>) -> Self {
        self.historical_returns.insert(token.into(), returns);
        self
    }
}

/// Decision agent trait
#[async_trait]
pub trait Agent: Send {
    type Input: Send;
    type Output: Send;

    /// Agent name for logging and errors
    fn name(&self) -> &str;

    /// Stage the input for the next `run`, replacing any staged input
    fn update_state(&mut self, input: Self::Input);

    /// Remove and return the staged input
    fn take_state(&mut self) -> Option<Self::Input>;

    /// Process one input
    async fn process(&mut self, input: Self::Input) -> Result<Self::Output>;

    /// Process the staged input
    async fn run(&mut self) -> Result<Self::Output> {
        let input = self.take_state().ok_or_else(|| Error::MissingState {
            agent: self.name().to_string(),
        })?;
        self.process(input).await
    }

    /// Called with every tick's market data before any agent runs (optional)
    fn on_market_data(&mut self, _data: &MarketData) {}
}
