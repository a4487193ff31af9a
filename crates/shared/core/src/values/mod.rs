use chrono::{DateTime, Utc};

/// Price value in quote currency
pub type Price = f64;

/// Quantity value in token units
pub type Quantity = f64;

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;

/// Token identifier (e.g. "ETH")
pub type Token = String;
