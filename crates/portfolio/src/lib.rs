//! Barn Portfolio
//!
//! Constrained portfolio optimization and rebalancing.
//!
//! - [`ReturnMatrix`]: aligned per-token return rows, mean and covariance
//! - [`SharpeSolver`]: projected gradient ascent on the risk-adjusted return,
//!   reporting a tagged [`SolverOutcome`]
//! - [`PortfolioOptimizer`]: positions, bounded price history, target weights
//!   and rebalancing trades

pub mod error;
pub mod optimizer;
pub mod rebalance;
pub mod returns;
pub mod solver;

pub use error::{Error, Result};
pub use optimizer::{OptimizerConfig, PortfolioOptimizer, optimize_returns};
pub use rebalance::{DEFAULT_REBALANCE_THRESHOLD, Drift, drifts};
pub use returns::ReturnMatrix;
pub use solver::{FailureReason, SharpeSolver, SolverConfig, SolverOutcome, project_capped_simplex};
