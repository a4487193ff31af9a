use crate::values::{Price, Quantity, Timestamp, Token};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A portfolio holding in one token
///
/// A newer position for the same token supersedes the old one; positions are
/// never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Token held
    pub token: Token,
    /// Amount held (token units)
    pub amount: Quantity,
    /// Average entry price
    pub entry_price: Price,
    /// Current market price
    pub current_price: Price,
    /// When this position snapshot was taken
    pub timestamp: Timestamp,
}

impl Position {
    /// Create a new position snapshot stamped with the current time
    pub fn new(
        token: impl Into<Token>,
        amount: Quantity,
        entry_price: Price,
        current_price: Price,
    ) -> Self {
        Self {
            token: token.into(),
            amount,
            entry_price,
            current_price,
            timestamp: Utc::now(),
        }
    }

    /// Value of the holding at the current price
    pub fn market_value(&self) -> f64 {
        self.amount * self.current_price
    }

    /// Unrealized PnL versus the entry price
    pub fn unrealized_pnl(&self) -> f64 {
        self.amount * (self.current_price - self.entry_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_value_and_pnl() {
        let pos = Position::new("ETH", 10.0, 1900.0, 2000.0);

        assert_eq!(pos.market_value(), 20_000.0);
        assert_eq!(pos.unrealized_pnl(), 1000.0);
    }
}
