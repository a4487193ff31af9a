//! Agent errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Agent '{agent}' was run without input state")]
    MissingState { agent: String },

    #[error(transparent)]
    Optimization(#[from] barn_portfolio::Error),

    #[error(transparent)]
    Venue(#[from] barn_ports::VenueError),

    #[error("Analysis task failed: {0}")]
    AnalysisTask(String),
}

impl From<barn_market_state::Error> for Error {
    fn from(err: barn_market_state::Error) -> Self {
        match err {
            barn_market_state::Error::AnalysisTask(msg) => Error::AnalysisTask(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
