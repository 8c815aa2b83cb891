use thiserror::Error;

use crate::utils::UtilError;

#[derive(Debug, Error, Clone)]
pub enum ProviderError {
    #[error("Unknown or expired session")]
    UnknownSession,

    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Invalid session duration: {0} seconds")]
    InvalidDuration(i64),

    #[error("Storage error: {0}")]
    Storage(String),

    /// Error from utils operations
    #[error("Utils error: {0}")]
    Utils(#[from] UtilError),
}
