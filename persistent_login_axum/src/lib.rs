//! persistent_login_axum - Axum integration for persistent customer logins
//!
//! Add [`extend_customer_session`] with `axum::middleware::from_fn_with_state`
//! and every response to a qualifying customer carries the renewed session
//! cookie and marker cookie when the policy asks for them.

mod assets;
mod config;
mod middleware;

pub use assets::{account_stylesheet_link, account_stylesheet_url, assets_router};
pub use config::PL_ROUTE_PREFIX;
pub use middleware::{FeatureGate, PersistentLogin, extend_customer_session};

// Re-export the pieces of the core crate applications need to wire things up
pub use persistent_login::{
    CookieNames, IdentitySessionProvider, MemorySessionProvider, ProviderUser,
    SessionExtensionPolicy,
};
