//! Runner errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Agent(#[from] barn_agents::Error),

    #[error("Risk tolerance must be within [0, 1], got {0}")]
    InvalidRiskTolerance(f64),

    #[error("Allocation is empty")]
    EmptyAllocation,

    #[error("Allocation total must be positive, got {0}")]
    InvalidAllocationTotal(f64),
}

pub type Result<T> = std::result::Result<T, Error>;
