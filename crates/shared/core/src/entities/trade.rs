use crate::values::{Quantity, Token};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeAction {
    Buy,
    Sell,
}

impl TradeAction {
    /// +1 for buys, -1 for sells
    pub fn sign(&self) -> f64 {
        match self {
            TradeAction::Buy => 1.0,
            TradeAction::Sell => -1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TradeAction::Buy => "buy",
            TradeAction::Sell => "sell",
        }
    }
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An action string outside {buy, sell}
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid action '{0}'. Use \"buy\" or \"sell\".")]
pub struct InvalidActionError(pub String);

impl FromStr for TradeAction {
    type Err = InvalidActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy" => Ok(TradeAction::Buy),
            "sell" => Ok(TradeAction::Sell),
            other => Err(InvalidActionError(other.to_string())),
        }
    }
}

/// Instruction to move a holding toward its target weight
///
/// Derived each optimization cycle, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalanceTrade {
    pub token: Token,
    pub action: TradeAction,
    /// Always non-negative; direction lives in `action`
    pub amount: Quantity,
}

impl RebalanceTrade {
    /// Build a trade from a signed delta (positive = buy)
    pub fn from_delta(token: impl Into<Token>, delta: f64) -> Self {
        Self {
            token: token.into(),
            action: if delta > 0.0 {
                TradeAction::Buy
            } else {
                TradeAction::Sell
            },
            amount: delta.abs(),
        }
    }
}
