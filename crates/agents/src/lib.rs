//! Barn Decision Agents
//!
//! Thin stateful adapters over the analytics crates, sharing one contract:
//! stage an input with `update_state`, consume it with `run`.
//!
//! | Agent | Input | Output |
//! |-------|-------|--------|
//! | [`RiskAnalysisAgent`] | [`MarketSignal`](barn_core::MarketSignal) | [`RiskAssessment`] |
//! | [`TradingAgent`] | [`TradeSignal`] | [`TradeDecision`] |
//! | [`PortfolioAgent`] | [`PortfolioInput`] | [`PortfolioUpdate`] |
//!
//! Trades are executed through an [`ExecutionVenue`](barn_ports::ExecutionVenue);
//! [`SimulatedVenue`] fills everything in memory.

pub mod agent;
pub mod error;
pub mod portfolio;
pub mod risk_analysis;
pub mod trading;
pub mod venue;

pub use agent::{Agent, MarketData};
pub use error::{Error, Result};
pub use portfolio::{PortfolioAgent, PortfolioAgentConfig, PortfolioInput, PortfolioUpdate};
pub use risk_analysis::{RiskAnalysisAgent, RiskAnalysisConfig, RiskAssessment};
pub use trading::{
    ExecutedTrade, RISK_TOO_HIGH, TradeDecision, TradeSignal, TradingAgent, TradingConfig,
};
pub use venue::SimulatedVenue;
