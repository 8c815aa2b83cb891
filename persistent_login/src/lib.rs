//! persistent_login - Keeps customers logged in by extending their session cookie
//!
//! On every request the [`SessionExtensionPolicy`] decides whether the native
//! session cookie of a customer should be re-issued with a lifetime of about
//! 30 years. A short-lived marker cookie records that this happened, so the
//! costly re-issue runs at most once a day per client.
//!
//! The identity provider (login, logout, credential checks, session storage)
//! stays external and is reached through [`IdentitySessionProvider`].

mod config;
mod cookie;
mod coordination;
mod policy;
mod provider;
mod utils;

pub use config::{
    CookieNames, MARKER_COOKIE_NAME, MARKER_COOKIE_VALUE, MARKER_MAX_AGE,
    PERSISTENT_LOGIN_ENABLED, QUALIFYING_ROLE, SESSION_COOKIE_MAX_AGE, SESSION_COOKIE_NAME,
    TIMESTAMP_BOUND,
};

pub use cookie::{
    CookieError, apply_instructions, cookie_value, expire_cookie_header, marker_present,
    set_cookie_header,
};

pub use coordination::{
    ExtensionOutcome, PersistentLoginError, extend_session, resolve_request_context,
};

pub use policy::{
    CookieInstruction, LONG_DURATION_SECONDS, LONG_DURATION_YEARS, OVERFLOW_MARGIN_SECONDS, Plan,
    RequestContext, SessionExtensionPolicy, TimestampBound, compute_long_duration, is_clamped,
};

pub use provider::{
    IdentitySessionProvider, IssuedSession, MemorySessionProvider, ProviderError, ProviderUser,
    SUPERSEDED_GRACE_SECONDS,
};

pub use utils::UtilError;
