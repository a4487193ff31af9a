//! Barn Ports
//!
//! Port definitions (traits) for the Barn decision pipeline.
//! These define the boundaries between the decision logic and whatever
//! collaborators sit outside it: time, trade execution, event reporting.

mod clock;
mod error;
mod observer;
mod venue;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{VenueError, VenueResult};
pub use observer::{PipelineEvent, PipelineObserver, Stage};
pub use venue::{ExecutionVenue, TradeOrder, TradeReceipt};
