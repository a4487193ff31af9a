//! Barn Statistics Kernel
//!
//! Pure, stateless functions over ordered `f64` series. Every function is
//! deterministic: identical input always yields identical output.
//!
//! # Neutral defaults
//!
//! Only [`returns`] fails on short input. Everything built on top of it
//! (volatility, value at risk, expected shortfall) degrades to `0.0` when
//! fewer than two points are available, so callers that just want a number
//! never have to handle [`StatsError::InsufficientData`]. Callers that need to
//! tell "no signal" apart from "zero signal" call [`returns`] directly.

mod error;
mod series;
mod tail;
mod trend;

pub use error::{StatsError, StatsResult};
pub use series::{mean, returns, sharpe_ratio, std_dev, volatility};
pub use tail::{expected_shortfall, percentile, value_at_risk};
pub use trend::{momentum, trend};

/// Confidence level used for VaR / expected shortfall when none is configured
pub const DEFAULT_CONFIDENCE: f64 = 0.95;

/// Short moving-average window for momentum
pub const MOMENTUM_SHORT_WINDOW: usize = 5;

/// Long moving-average window for momentum
pub const MOMENTUM_LONG_WINDOW: usize = 20;
