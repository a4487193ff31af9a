//! Simulated execution venue
//!
//! Fills every valid order immediately and issues sequential identifiers
//! (`tx_0`, `tx_1`, ...). No market is contacted.

use async_trait::async_trait;
use barn_ports::{ExecutionVenue, TradeOrder, TradeReceipt, VenueError, VenueResult};
use chrono::Utc;
use log::info;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct SimulatedVenue {
    next_id: AtomicU64,
}

impl SimulatedVenue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of orders filled so far
    pub fn fills(&self) -> u64 {
        self.next_id.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExecutionVenue for SimulatedVenue {
    fn name(&self) -> &str {
        "SimulatedVenue"
    }

    async fn execute(&self, order: &TradeOrder) -> VenueResult<TradeReceipt> {
        if !order.amount.is_finite() || order.amount < 0.0 {
            return Err(VenueError::InvalidAmount(order.amount));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let receipt = TradeReceipt {
            transaction_id: format!("tx_{id}"),
            token: order.token.clone(),
            action: order.action,
            amount: order.amount,
            executed_at: Utc::now(),
        };

        info!(
            "[VENUE] {} {} {} -> {}",
            order.action, order.amount, order.token, receipt.transaction_id
        );
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use barn_core::TradeAction;

    #[tokio::test]
    async fn test_sequential_ids() {
        let venue = SimulatedVenue::new();
        let order = TradeOrder::new("ETH", TradeAction::Buy, 1.0);

        assert_eq!(venue.execute(&order).await.unwrap().transaction_id, "tx_0");
        assert_eq!(venue.execute(&order).await.unwrap().transaction_id, "tx_1");
        assert_eq!(venue.fills(), 2);
    }

    #[tokio::test]
    async fn test_rejects_invalid_amount() {
        let venue = SimulatedVenue::new();

        let negative = TradeOrder::new("ETH", TradeAction::Sell, -1.0);
        assert_eq!(
            venue.execute(&negative).await.unwrap_err(),
            VenueError::InvalidAmount(-1.0)
        );

        let nan = TradeOrder::new("ETH", TradeAction::Sell, f64::NAN);
        assert!(venue.execute(&nan).await.is_err());
        assert_eq!(venue.fills(), 0);
    }
}
