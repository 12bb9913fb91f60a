use thiserror::Error;
use crate::services::StoreError;

/// Failures surfaced by the matching engine
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No active profile for seeker: {0}")]
    NoActiveProfile(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl MatchError {
    /// HTTP status code the routing layer reports for this error
    pub fn status_code(&self) -> u16 {
        match self {
            MatchError::NotFound(_) | MatchError::NoActiveProfile(_) => 404,
            MatchError::InvalidInput(_) => 400,
            MatchError::Store(_) => 500,
        }
    }
}
