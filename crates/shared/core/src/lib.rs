//! Barn Core Domain
//!
//! Pure domain types for the Barn decision pipeline.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    AllocationWeights, InvalidActionError, MarketSignal, Observation, Position, RebalanceTrade,
    RiskMetrics, TradeAction,
};
pub use values::{Price, Quantity, Timestamp, Token};
