//! Barn Risk Manager
//!
//! Rolling risk monitoring per token:
//!
//! - **History**: time-bounded window of [`RiskMetrics`](barn_core::RiskMetrics)
//! - **Composite Risk**: weighted, normalized volatility / VaR / shortfall /
//!   liquidity score
//! - **Limits**: per-token thresholds, breaches reported on demand
//! - **Report**: per-token trends, momentum and a global summary
//!
//! ## Architecture
//!
//! ```text
//! RiskMetrics ──► History (risk_window_days) ──► Composite Risk ──┬──► Breaches
//!                                                                 └──► RiskReport
//! Limits ─────────────────────────────────────────────────────────┘
//! ```

pub mod manager;
pub mod parameters;
pub mod report;

// Re-export main types
pub use manager::RiskManager;
pub use parameters::{CompositeRiskWeights, RiskManagerConfig};
pub use report::{
    GlobalRiskMetrics, RiskBreach, RiskReport, TokenRiskMetrics, TrendAnalysis, TrendDirection,
};
