//! Market analysis errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Analysis task failed: {0}")]
    AnalysisTask(String),
}

pub type Result<T> = std::result::Result<T, Error>;
