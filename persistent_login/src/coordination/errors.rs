//! Error types for the per-request driver

use thiserror::Error;

use crate::cookie::CookieError;
use crate::provider::ProviderError;

/// Errors that can occur while extending a session
#[derive(Error, Debug, Clone)]
pub enum PersistentLoginError {
    /// Error from the identity provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from writing cookie headers
    #[error("Cookie error: {0}")]
    Cookie(#[from] CookieError),
}
