//! Trading Agent
//!
//! Gates on the risk score, sizes the position inversely to risk and takes
//! the direction from the price trend.
//!
//! ```text
//! risk > max_risk_threshold  ──► Hold ("Risk too high")
//! otherwise                  ──► size = base × (1 - risk)
//!                                action = buy if trend > 0 else sell
//!                                ──► ExecutionVenue ──► Executed
//! ```

use crate::agent::{Agent, MarketData};
use crate::error::Result;
use async_trait::async_trait;
use barn_core::{Price, Quantity, Timestamp, Token, TradeAction};
use barn_ports::{ExecutionVenue, TradeOrder};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

pub const RISK_TOO_HIGH: &str = "Risk too high";

/// Configuration for the Trading Agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TradingConfig {
    /// Risk scores above this hold instead of trading
    pub max_risk_threshold: f64,
    /// Size traded at zero risk
    pub base_position_size: f64,
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            max_risk_threshold: 0.8,
            base_position_size: 1.0,
        }
    }
}

/// Input of one trading decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSignal {
    pub token: Token,
    pub risk_score: f64,
    pub price_trend: f64,
    /// Latest known price, if any
    #[serde(default)]
    pub reference_price: Option<Price>,
}

impl TradeSignal {
    pub fn new(token: impl Into<Token>, risk_score: f64, price_trend: f64) -> Self {
        Self {
            token: token.into(),
            risk_score,
            price_trend,
            reference_price: None,
        }
    }

    /// Builder: Set the reference price
    pub fn with_reference_price(mut self, price: Price) -> Self {
        self.reference_price = Some(price);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutedTrade {
    pub token: Token,
    pub action: TradeAction,
    pub size: Quantity,
    pub reference_price: Option<Price>,
    pub transaction_id: String,
    pub timestamp: Timestamp,
}

/// Outcome of one trading decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TradeDecision {
    Hold { token: Token, reason: String },
    Executed(ExecutedTrade),
}

impl TradeDecision {
    pub fn is_hold(&self) -> bool {
        matches!(self, TradeDecision::Hold { .. })
    }

    pub fn executed(&self) -> Option<&ExecutedTrade> {
        match self {
            TradeDecision::Executed(trade) => Some(trade),
            TradeDecision::Hold { .. } => None,
        }
    }
}

pub struct TradingAgent {
    name: String,
    config: TradingConfig,
    venue: Arc<dyn ExecutionVenue>,
    state: Option<TradeSignal>,
    /// Running net position (buys add, sells subtract)
    net_position: f64,
    history: Vec<ExecutedTrade>,
    /// Latest price seen per token
    last_prices: BTreeMap<Token, Price>,
}

impl TradingAgent {
    pub fn new(
        name: impl Into<String>,
        config: TradingConfig,
        venue: Arc<dyn ExecutionVenue>,
    ) -> Self {
        Self {
            name: name.into(),
            config,
            venue,
            state: None,
            net_position: 0.0,
            history: Vec::new(),
            last_prices: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &TradingConfig {
        &self.config
    }

    pub fn net_position(&self) -> f64 {
        self.net_position
    }

    pub fn trade_history(&self) -> &[ExecutedTrade] {
        &self.history
    }

    /// Latest price recorded by `on_market_data`
    pub fn reference_price(&self, token: &str) -> Option<Price> {
        self.last_prices.get(token).copied()
    }

    /// `base_position_size × (1 - risk_score)`
    pub fn position_size(&self, risk_score: f64) -> Quantity {
        self.config.base_position_size * (1.0 - risk_score)
    }

    fn should_hold(&self, risk_score: f64) -> bool {
        risk_score.is_nan() || risk_score > self.config.max_risk_threshold
    }
}

#[async_trait]
impl Agent for TradingAgent {
    type Input = TradeSignal;
    type Output = TradeDecision;

    fn name(&self) -> &str {
        &self.name
    }

    fn update_state(&mut self, input: TradeSignal) {
        self.state = Some(input);
    }

    fn take_state(&mut self) -> Option<TradeSignal> {
        self.state.take()
    }

    async fn process(&mut self, signal: TradeSignal) -> Result<TradeDecision> {
        if self.should_hold(signal.risk_score) {
            debug!(
                "[TRADER] {} hold: risk {:.4} > {:.4}",
                signal.token, signal.risk_score, self.config.max_risk_threshold
            );
            return Ok(TradeDecision::Hold {
                token: signal.token,
                reason: RISK_TOO_HIGH.to_string(),
            });
        }

        let action = if signal.price_trend > 0.0 {
            TradeAction::Buy
        } else {
            TradeAction::Sell
        };
        let size = self.position_size(signal.risk_score);

        let order = TradeOrder::new(signal.token.clone(), action, size);
        let receipt = self.venue.execute(&order).await?;

        self.net_position += action.sign() * size;

        let trade = ExecutedTrade {
            token: signal.token,
            action,
            size,
            reference_price: signal
                .reference_price
                .or_else(|| self.last_prices.get(&order.token).copied()),
            transaction_id: receipt.transaction_id,
            timestamp: receipt.executed_at,
        };

        info!(
            "[TRADER] {} {} {:.4} via {} ({}), net position {:.4}",
            trade.action,
            trade.token,
            trade.size,
            self.venue.name(),
            trade.transaction_id,
            self.net_position
        );

        self.history.push(trade.clone());
        Ok(TradeDecision::Executed(trade))
    }

    fn on_market_data(&mut self, data: &MarketData) {
        self.last_prices
            .insert(data.signal.token.clone(), data.signal.price);
    }
}
