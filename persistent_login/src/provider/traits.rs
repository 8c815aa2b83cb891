use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::errors::ProviderError;

/// A session cookie value freshly minted by the identity provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedSession {
    /// Value to store in the session cookie
    pub value: String,
    pub expires_at: DateTime<Utc>,
    /// Cookie lifetime in seconds
    pub max_age: i64,
}

/// The host's identity and session subsystem.
///
/// Credentials, login and logout stay with the implementor. The session
/// extension only asks who the current user is and has the provider
/// re-issue and validate its own session cookie. Every call is keyed by the
/// raw session cookie value the client sent.
#[async_trait]
pub trait IdentitySessionProvider: Send + Sync {
    /// Whether the session cookie belongs to a live, authenticated session
    async fn is_authenticated(&self, session_cookie: Option<&str>) -> Result<bool, ProviderError>;

    /// Primary role of the user owning the session, if any
    async fn current_user_role(
        &self,
        session_cookie: Option<&str>,
    ) -> Result<Option<String>, ProviderError>;

    /// Re-issues the session cookie for the same user with the given lifetime
    async fn issue_session_cookie(
        &self,
        session_cookie: &str,
        duration_seconds: i64,
    ) -> Result<IssuedSession, ProviderError>;

    /// Whether a raw session cookie value is valid right now
    async fn validate_session_cookie(&self, raw_value: &str) -> Result<bool, ProviderError>;
}
