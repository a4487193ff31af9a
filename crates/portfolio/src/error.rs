//! Portfolio errors

use crate::solver::FailureReason;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Optimization did not converge after {iterations} iterations: {reason}")]
    OptimizationNonConvergence {
        reason: FailureReason,
        iterations: usize,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, Error>;
