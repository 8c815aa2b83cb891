use chrono::Utc;
use http::HeaderMap;

use crate::config::CookieNames;
use crate::cookie::{apply_instructions, cookie_value, marker_present};
use crate::policy::{CookieInstruction, Plan, RequestContext, SessionExtensionPolicy};
use crate::provider::{IdentitySessionProvider, IssuedSession};

use super::errors::PersistentLoginError;

/// What one run of the session extension decided and wrote
#[derive(Debug, Clone, Default)]
pub struct ExtensionOutcome {
    pub instructions: Vec<CookieInstruction>,
    /// `Set-Cookie` headers to add to the response
    pub headers: HeaderMap,
    /// The re-issued session, when one was issued
    pub issued: Option<IssuedSession>,
}

/// Gathers the request facts the policy needs from the provider and the request cookies
pub async fn resolve_request_context<P>(
    provider: &P,
    headers: &HeaderMap,
    names: &CookieNames,
) -> Result<RequestContext, PersistentLoginError>
where
    P: IdentitySessionProvider + ?Sized,
{
    let session_cookie_raw_value = cookie_value(headers, &names.session);
    let session_cookie = session_cookie_raw_value.as_deref();

    let is_authenticated = provider.is_authenticated(session_cookie).await?;
    let user_role = if is_authenticated {
        provider.current_user_role(session_cookie).await?
    } else {
        None
    };

    Ok(RequestContext {
        is_authenticated,
        user_role,
        marker_cookie_present: marker_present(headers, &names.marker),
        session_cookie_raw_value,
    })
}

/// Runs the session extension policy for one request.
///
/// When the policy asks for a renewal, the provider re-issues the session
/// cookie and then validates the freshly issued value; the marker cookie is
/// only set when that validation succeeds. A failed issuance is not an error:
/// nothing is written and the next request tries again.
#[tracing::instrument(skip(provider, policy, names, headers))]
pub async fn extend_session<P>(
    provider: &P,
    policy: &SessionExtensionPolicy,
    names: &CookieNames,
    headers: &HeaderMap,
    flag_enabled: bool,
) -> Result<ExtensionOutcome, PersistentLoginError>
where
    P: IdentitySessionProvider + ?Sized,
{
    let ctx = resolve_request_context(provider, headers, names).await?;

    let duration_seconds = match policy.plan(&ctx, flag_enabled, Utc::now().timestamp()) {
        Plan::Settled(instructions) => {
            let headers = apply_instructions(&instructions, None, names)?;
            return Ok(ExtensionOutcome {
                instructions,
                headers,
                issued: None,
            });
        }
        Plan::Renew { duration_seconds } => duration_seconds,
    };

    let Some(current) = ctx.session_cookie_raw_value.as_deref() else {
        tracing::warn!("Qualifying request without a session cookie, skipping renewal");
        return Ok(ExtensionOutcome::default());
    };

    let issued = match provider.issue_session_cookie(current, duration_seconds).await {
        Ok(issued) => issued,
        Err(e) => {
            tracing::warn!("Failed to issue long-lived session cookie: {}", e);
            return Ok(ExtensionOutcome::default());
        }
    };
    tracing::info!(
        "Issued long-lived session cookie, expires at {}",
        issued.expires_at
    );

    let validated = provider
        .validate_session_cookie(&issued.value)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to validate issued session cookie: {}", e);
            false
        });

    let instructions = policy.complete(duration_seconds, validated);
    let headers = apply_instructions(&instructions, Some(&issued), names)?;

    Ok(ExtensionOutcome {
        instructions,
        headers,
        issued: Some(issued),
    })
}
