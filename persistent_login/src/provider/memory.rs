use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::Mutex;

use crate::utils::gen_random_string;

use super::errors::ProviderError;
use super::traits::{IdentitySessionProvider, IssuedSession};

/// Seconds a re-issued session token stays usable after its replacement is minted.
/// Covers requests already in flight with the old cookie.
pub const SUPERSEDED_GRACE_SECONDS: i64 = 60;

/// A user known to [`MemorySessionProvider`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderUser {
    pub id: String,
    /// Roles in assignment order. The first one is the user's role.
    pub roles: Vec<String>,
}

impl ProviderUser {
    pub fn new<I, S>(id: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn primary_role(&self) -> Option<&str> {
        self.roles.first().map(String::as_str)
    }
}

#[derive(Debug, Clone)]
struct StoredSession {
    user_id: String,
    expires_at: DateTime<Utc>,
}

impl StoredSession {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// In-process identity provider holding users and sessions in memory.
///
/// Intended for tests and demos. Sessions are opaque random tokens; re-issuing
/// a session mints a new token and cuts the old one down to
/// [`SUPERSEDED_GRACE_SECONDS`]. Expired entries are dropped on lookup and on
/// every mint.
#[derive(Debug, Default)]
pub struct MemorySessionProvider {
    users: Mutex<HashMap<String, ProviderUser>>,
    sessions: Mutex<HashMap<String, StoredSession>>,
}

impl MemorySessionProvider {
    pub fn new() -> Self {
        tracing::info!("Creating new in-memory session provider");
        Self::default()
    }

    pub async fn register_user(&self, user: ProviderUser) {
        tracing::debug!("Registering user {} with roles {:?}", user.id, user.roles);
        self.users.lock().await.insert(user.id.clone(), user);
    }

    /// Starts a session for a registered user
    pub async fn login(&self, user_id: &str, ttl: u64) -> Result<IssuedSession, ProviderError> {
        if !self.users.lock().await.contains_key(user_id) {
            return Err(ProviderError::UnknownUser(user_id.to_string()));
        }
        let ttl = i64::try_from(ttl).map_err(|_| ProviderError::InvalidDuration(i64::MAX))?;
        self.mint(user_id, ttl).await
    }

    /// Ends the session identified by `session_cookie`. Unknown tokens are ignored.
    pub async fn logout(&self, session_cookie: &str) {
        self.sessions.lock().await.remove(session_cookie);
    }

    /// User owning a live session
    pub async fn session_user(&self, session_cookie: &str) -> Option<ProviderUser> {
        let session = self.live_session(session_cookie).await?;
        self.users.lock().await.get(&session.user_id).cloned()
    }

    async fn live_session(&self, session_cookie: &str) -> Option<StoredSession> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.get(session_cookie)?;
        if session.is_live(Utc::now()) {
            return Some(session.clone());
        }
        tracing::debug!("Session expired at {}, removing", session.expires_at);
        sessions.remove(session_cookie);
        None
    }

    /// Number of stored sessions, expired ones included
    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }

    async fn mint(&self, user_id: &str, duration_seconds: i64) -> Result<IssuedSession, ProviderError> {
        let expires_at = TimeDelta::try_seconds(duration_seconds)
            .and_then(|delta| Utc::now().checked_add_signed(delta))
            .ok_or(ProviderError::InvalidDuration(duration_seconds))?;

        let token = gen_random_string(32)?;
        let mut sessions = self.sessions.lock().await;
        let now = Utc::now();
        let before = sessions.len();
        sessions.retain(|_, session| session.is_live(now));
        if sessions.len() < before {
            tracing::debug!("Swept {} expired sessions", before - sessions.len());
        }
        sessions.insert(
            token.clone(),
            StoredSession {
                user_id: user_id.to_string(),
                expires_at,
            },
        );

        Ok(IssuedSession {
            value: token,
            expires_at,
            max_age: duration_seconds,
        })
    }
}

#[async_trait]
impl IdentitySessionProvider for MemorySessionProvider {
    async fn is_authenticated(&self, session_cookie: Option<&str>) -> Result<bool, ProviderError> {
        let Some(session_cookie) = session_cookie else {
            return Ok(false);
        };
        Ok(self.session_user(session_cookie).await.is_some())
    }

    async fn current_user_role(
        &self,
        session_cookie: Option<&str>,
    ) -> Result<Option<String>, ProviderError> {
        let Some(session_cookie) = session_cookie else {
            return Ok(None);
        };
        Ok(self
            .session_user(session_cookie)
            .await
            .and_then(|user| user.primary_role().map(str::to_string)))
    }

    #[tracing::instrument(skip(self, session_cookie))]
    async fn issue_session_cookie(
        &self,
        session_cookie: &str,
        duration_seconds: i64,
    ) -> Result<IssuedSession, ProviderError> {
        let session = self
            .live_session(session_cookie)
            .await
            .ok_or(ProviderError::UnknownSession)?;

        let issued = self.mint(&session.user_id, duration_seconds).await?;
        tracing::debug!("Issued session for {} until {}", session.user_id, issued.expires_at);

        let grace_end = Utc::now() + TimeDelta::seconds(SUPERSEDED_GRACE_SECONDS);
        if let Some(old) = self.sessions.lock().await.get_mut(session_cookie) {
            old.expires_at = old.expires_at.min(grace_end);
        }
        Ok(issued)
    }

    async fn validate_session_cookie(&self, raw_value: &str) -> Result<bool, ProviderError> {
        Ok(self.live_session(raw_value).await.is_some())
    }
}
