use thiserror::Error;

/// Errors raised by an execution venue
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VenueError {
    #[error("Order rejected by {venue}: {reason}")]
    Rejected { venue: String, reason: String },

    #[error("Invalid order amount: {0}")]
    InvalidAmount(f64),
}

pub type VenueResult<T> = std::result::Result<T, VenueError>;
