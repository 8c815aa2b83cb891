use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::header::SET_COOKIE;

use persistent_login::{
    CookieNames, IdentitySessionProvider, PERSISTENT_LOGIN_ENABLED, SessionExtensionPolicy,
    extend_session,
};

/// Per-request override of the feature flag, e.g. to switch the policy off for some paths
pub type FeatureGate = Arc<dyn Fn(&Request) -> bool + Send + Sync>;

/// State for [`extend_customer_session`]
///
/// ```no_run
/// use std::sync::Arc;
/// use axum::{Router, middleware::from_fn_with_state, routing::get};
/// use persistent_login_axum::{MemorySessionProvider, PersistentLogin, extend_customer_session};
///
/// let provider = Arc::new(MemorySessionProvider::new());
/// let persistent_login = PersistentLogin::new(provider);
///
/// let app: Router = Router::new()
///     .route("/", get(|| async { "Hello" }))
///     .layer(from_fn_with_state(
///         persistent_login,
///         extend_customer_session::<MemorySessionProvider>,
///     ));
/// ```
pub struct PersistentLogin<P: ?Sized> {
    provider: Arc<P>,
    policy: SessionExtensionPolicy,
    names: CookieNames,
    enabled: bool,
    gate: Option<FeatureGate>,
}

impl<P: ?Sized> Clone for PersistentLogin<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            policy: self.policy.clone(),
            names: self.names.clone(),
            enabled: self.enabled,
            gate: self.gate.clone(),
        }
    }
}

impl<P> PersistentLogin<P>
where
    P: IdentitySessionProvider + ?Sized,
{
    /// Policy, cookie names and feature flag come from the environment
    pub fn new(provider: Arc<P>) -> Self {
        Self {
            provider,
            policy: SessionExtensionPolicy::from_env(),
            names: CookieNames::from_env(),
            enabled: *PERSISTENT_LOGIN_ENABLED,
            gate: None,
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: SessionExtensionPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_cookie_names(mut self, names: CookieNames) -> Self {
        self.names = names;
        self
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Installs an override consulted on every request. Returning false
    /// disables the policy for that request, which also clears the marker cookie.
    #[must_use]
    pub fn with_gate<F>(mut self, gate: F) -> Self
    where
        F: Fn(&Request) -> bool + Send + Sync + 'static,
    {
        self.gate = Some(Arc::new(gate));
        self
    }

    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    pub fn cookie_names(&self) -> &CookieNames {
        &self.names
    }

    fn is_enabled(&self, req: &Request) -> bool {
        self.enabled && self.gate.as_ref().is_none_or(|gate| gate(req))
    }
}

/// Middleware running the session extension policy after the handler.
///
/// The handler runs first so that a logout or login it performs is visible to
/// the policy. When the handler's response already sets the session cookie,
/// the policy runs with the flag off and can only clear the marker. The
/// `Set-Cookie` headers the policy produces are appended to the handler's
/// response. Failures are logged and never block the request.
pub async fn extend_customer_session<P>(
    State(persistent_login): State<PersistentLogin<P>>,
    req: Request,
    next: Next,
) -> Response
where
    P: IdentitySessionProvider + ?Sized + 'static,
{
    let mut enabled = persistent_login.is_enabled(&req);
    let headers = req.headers().clone();

    let mut response = next.run(req).await;

    if enabled && sets_cookie(&response, &persistent_login.names.session) {
        tracing::debug!("Handler wrote the session cookie, skipping renewal");
        enabled = false;
    }

    let outcome = extend_session(
        persistent_login.provider.as_ref(),
        &persistent_login.policy,
        &persistent_login.names,
        &headers,
        enabled,
    )
    .await;

    match outcome {
        Ok(outcome) => {
            for value in outcome.headers.get_all(SET_COOKIE) {
                response.headers_mut().append(SET_COOKIE, value.clone());
            }
        }
        Err(e) => {
            tracing::warn!("Session extension skipped: {}", e);
        }
    }

    response
}

fn sets_cookie(response: &Response, name: &str) -> bool {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| {
            value
                .split_once('=')
                .is_some_and(|(cookie_name, _)| cookie_name.trim() == name)
        })
}
