use crate::error::VenueResult;
use async_trait::async_trait;
use barn_core::{Quantity, Timestamp, Token, TradeAction};
use serde::{Deserialize, Serialize};

/// An order handed to a venue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeOrder {
    pub token: Token,
    pub action: TradeAction,
    pub amount: Quantity,
}

impl TradeOrder {
    pub fn new(token: impl Into<Token>, action: TradeAction, amount: Quantity) -> Self {
        Self {
            token: token.into(),
            action,
            amount,
        }
    }
}

/// Venue acknowledgement of an executed order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeReceipt {
    pub transaction_id: String,
    pub token: Token,
    pub action: TradeAction,
    pub amount: Quantity,
    pub executed_at: Timestamp,
}

/// Port for trade execution
///
/// The decision logic never talks to a market directly. A simulated venue
/// ships with the agents crate; a real exchange client implements this trait
/// without touching the decision code.
#[async_trait]
pub trait ExecutionVenue: Send + Sync {
    /// Venue name for logging
    fn name(&self) -> &str;

    /// Execute an order, returning the venue's receipt
    async fn execute(&self, order: &TradeOrder) -> VenueResult<TradeReceipt>;
}
