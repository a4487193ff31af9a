use crate::values::{Price, Quantity, Timestamp, Token};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One market observation for one token, as delivered by the feed.
///
/// Immutable once created; the feed emits at most one per tick per token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSignal {
    /// When the observation was taken (feed time, not arrival time)
    pub timestamp: Timestamp,
    /// Token this observation belongs to
    pub token: Token,
    /// Last traded price
    pub price: Price,
    /// Traded volume over the observation period
    pub volume: Quantity,
    /// Derived indicators (rsi, macd, bands, ...) keyed by name
    #[serde(default)]
    pub indicators: BTreeMap<String, f64>,
}

impl MarketSignal {
    /// Create a signal stamped with the current time and no indicators
    pub fn new(token: impl Into<Token>, price: Price, volume: Quantity) -> Self {
        Self {
            timestamp: Utc::now(),
            token: token.into(),
            price,
            volume,
            indicators: BTreeMap::new(),
        }
    }

    /// Builder: Set the feed timestamp
    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Builder: Add an indicator value
    pub fn with_indicator(mut self, name: impl Into<String>, value: f64) -> Self {
        self.indicators.insert(name.into(), value);
        self
    }

    /// Derive the observation stored in the market state window
    pub fn observation(&self) -> Observation {
        Observation {
            timestamp: self.timestamp,
            price: self.price,
            volume: self.volume,
            indicators: self.indicators.clone(),
        }
    }
}

/// An entry in a token's market state window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub timestamp: Timestamp,
    pub price: Price,
    pub volume: Quantity,
    pub indicators: BTreeMap<String, f64>,
}
