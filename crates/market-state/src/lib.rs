//! Barn Market State
//!
//! Bounded per-token market history and the analysis that runs over it:
//!
//! - [`MarketStateAggregator`]: FIFO observation windows per token
//! - [`RiskScorer`]: composite volatility / volume-trend risk score
//! - [`MarketAnalyzer`]: concurrent risk, metrics and candidate sub-tasks

pub mod aggregator;
pub mod analysis;
pub mod config;
pub mod error;
pub mod scorer;

pub use aggregator::{DEFAULT_WINDOW_SIZE, MarketSnapshot, MarketStateAggregator, TokenSnapshot};
pub use analysis::{MarketAnalysis, MarketAnalyzer, TokenMetrics};
pub use config::{MarketStateConfig, RiskScorerConfig};
pub use error::{Error, Result};
pub use scorer::{CandidateAction, CandidateSignal, RiskFactors, RiskScorer};
