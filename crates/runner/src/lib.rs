//! Barn Runner - Decision Pipeline
//!
//! Wires the decision agents into one pipeline pass per market data tick:
//!
//! - **Orchestrator**: Sequences risk analysis, trade decision and portfolio update
//! - **Observers**: Structured event reporting (log facade, in-memory recording)
//! - **Market Feed**: Seeded random-walk market data for simulations
//! - **Service**: Request-level operations for an outer API layer
//!
//! ## Architecture
//!
//! ```text
//!                         ┌─────────────────┐
//!                         │   Market Feed   │
//!                         │ (price/volume)  │
//!                         └────────┬────────┘
//!                                  │ MarketData
//!                                  ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         ORCHESTRATOR                            │
//! │                                                                 │
//! │  ┌──────────────────┐   risk_score   ┌──────────────────┐       │
//! │  │  Risk Analysis   │ ─────────────► │  Trading Agent   │       │
//! │  │  Agent           │   price_trend  │                  │       │
//! │  └──────────────────┘                └────────┬─────────┘       │
//! │                                               │ orders          │
//! │  ┌──────────────────┐                         ▼                 │
//! │  │  Portfolio       │              ┌──────────────────┐         │
//! │  │  Agent           │              │  ExecutionVenue  │         │
//! │  └──────────────────┘              └──────────────────┘         │
//! └──────────────────────────────┬──────────────────────────────────┘
//!                                │ PipelineEvent
//!                                ▼
//!                     ┌───────────────────────┐
//!                     │   PipelineObserver    │
//!                     └───────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod feed;
pub mod observer;
pub mod orchestrator;
pub mod service;

// Re-export main types
pub use config::{PORTFOLIO_MANAGER, PipelineConfig, RISK_ANALYZER, TRADER};
pub use error::{Error, Result};
pub use feed::{MarketFeed, MarketFeedConfig};
pub use observer::{LogObserver, RecordingObserver};
pub use orchestrator::{Orchestrator, TickResult};
pub use service::{
    ExecutionStatus, RiskAssessmentResponse, TradeExecutionResponse, assess_risk, execute_trade,
    optimize_portfolio,
};

// Re-export the tick input for convenience
pub use barn_agents::MarketData;
