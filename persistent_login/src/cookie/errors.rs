use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum CookieError {
    #[error("Header error: {0}")]
    Header(String),

    /// A session cookie write was requested without an issued session value
    #[error("No issued session to write into the session cookie")]
    MissingSession,
}
