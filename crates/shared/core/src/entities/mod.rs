mod allocation;
mod position;
mod risk_metrics;
mod signal;
mod trade;

pub use allocation::AllocationWeights;
pub use position::Position;
pub use risk_metrics::RiskMetrics;
pub use signal::{MarketSignal, Observation};
pub use trade::{InvalidActionError, RebalanceTrade, TradeAction};
