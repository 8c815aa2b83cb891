use chrono::Utc;

use crate::config::{MARKER_MAX_AGE, QUALIFYING_ROLE, TIMESTAMP_BOUND};

use super::duration::compute_long_duration;
use super::types::{CookieInstruction, RequestContext, TimestampBound};

/// Outcome of the decision procedure before any session cookie is issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// Nothing needs to be issued; these instructions are final.
    Settled(Vec<CookieInstruction>),
    /// The session cookie has to be re-issued with this lifetime.
    Renew { duration_seconds: i64 },
}

/// Decides, once per request, whether a customer's session cookie gets extended.
///
/// The decision short-circuits on the first matching branch:
///
/// 1. policy disabled: expire a leftover marker cookie, otherwise do nothing
/// 2. not authenticated, or role is not the qualifying role: same cleanup as 1
/// 3. marker cookie present: the session was extended within the last day, do nothing
/// 4. otherwise: issue a long-lived session cookie, and set the marker only when
///    the identity provider confirms the new session cookie is valid
///
/// The policy itself never touches cookies. It returns [`CookieInstruction`]s
/// that the cookie transport carries out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionExtensionPolicy {
    qualifying_role: String,
    marker_max_age: i64,
    timestamp_bound: TimestampBound,
}

impl Default for SessionExtensionPolicy {
    fn default() -> Self {
        Self {
            qualifying_role: "customer".to_string(),
            marker_max_age: MARKER_MAX_AGE,
            timestamp_bound: TimestampBound::Signed64,
        }
    }
}

impl SessionExtensionPolicy {
    /// Policy configured through `PERSISTENT_LOGIN_ROLE` and `PERSISTENT_LOGIN_TIMESTAMP_BOUND`
    pub fn from_env() -> Self {
        Self {
            qualifying_role: QUALIFYING_ROLE.clone(),
            marker_max_age: MARKER_MAX_AGE,
            timestamp_bound: *TIMESTAMP_BOUND,
        }
    }

    #[must_use]
    pub fn with_qualifying_role(mut self, role: impl Into<String>) -> Self {
        self.qualifying_role = role.into();
        self
    }

    #[must_use]
    pub fn with_timestamp_bound(mut self, bound: TimestampBound) -> Self {
        self.timestamp_bound = bound;
        self
    }

    pub fn qualifying_role(&self) -> &str {
        &self.qualifying_role
    }

    pub fn marker_max_age(&self) -> i64 {
        self.marker_max_age
    }

    pub fn timestamp_bound(&self) -> TimestampBound {
        self.timestamp_bound
    }

    /// Authenticated, with a role exactly equal to the qualifying role
    pub fn is_qualifying(&self, ctx: &RequestContext) -> bool {
        ctx.is_authenticated && ctx.user_role.as_deref() == Some(self.qualifying_role.as_str())
    }

    /// Steps 1 to 3 of the decision procedure, and the duration for step 4.
    pub fn plan(&self, ctx: &RequestContext, flag_enabled: bool, now: i64) -> Plan {
        if !flag_enabled {
            tracing::debug!("Persistent login disabled, cleaning up marker cookie");
            return Plan::Settled(cleanup(ctx));
        }

        if !self.is_qualifying(ctx) {
            tracing::debug!(
                "Not a qualifying principal (authenticated: {}, role: {:?})",
                ctx.is_authenticated,
                ctx.user_role
            );
            return Plan::Settled(cleanup(ctx));
        }

        if ctx.marker_cookie_present {
            tracing::trace!("Marker cookie present, session already extended");
            return Plan::Settled(vec![CookieInstruction::NoOp]);
        }

        let duration_seconds = compute_long_duration(now, self.timestamp_bound);
        if duration_seconds == 0 {
            // An expiry at or past the bound cannot be represented at all
            tracing::warn!(
                "No room left before the timestamp bound at {}, not extending session",
                now
            );
            return Plan::Settled(vec![CookieInstruction::NoOp]);
        }

        Plan::Renew { duration_seconds }
    }

    /// Step 4 after issuance: the marker follows only a validated session cookie.
    pub fn complete(&self, duration_seconds: i64, validated: bool) -> Vec<CookieInstruction> {
        let mut instructions = vec![CookieInstruction::IssueLongLivedSession(duration_seconds)];
        if validated {
            instructions.push(CookieInstruction::IssueMarker(self.marker_max_age));
        } else {
            tracing::debug!("Session cookie not validated, marker withheld until next request");
        }
        instructions
    }

    /// Runs the whole decision procedure at the current time.
    ///
    /// `validate` is called with the issued duration only when a long-lived
    /// session cookie is issued, and reports whether the identity provider
    /// confirmed it.
    pub fn evaluate<F>(
        &self,
        ctx: &RequestContext,
        flag_enabled: bool,
        validate: F,
    ) -> Vec<CookieInstruction>
    where
        F: FnOnce(i64) -> bool,
    {
        self.evaluate_at(ctx, flag_enabled, Utc::now().timestamp(), validate)
    }

    /// [`evaluate`](Self::evaluate) with an explicit unix timestamp.
    pub fn evaluate_at<F>(
        &self,
        ctx: &RequestContext,
        flag_enabled: bool,
        now: i64,
        validate: F,
    ) -> Vec<CookieInstruction>
    where
        F: FnOnce(i64) -> bool,
    {
        match self.plan(ctx, flag_enabled, now) {
            Plan::Settled(instructions) => instructions,
            Plan::Renew { duration_seconds } => {
                let validated = validate(duration_seconds);
                self.complete(duration_seconds, validated)
            }
        }
    }
}

fn cleanup(ctx: &RequestContext) -> Vec<CookieInstruction> {
    if ctx.marker_cookie_present {
        vec![CookieInstruction::ExpireMarker]
    } else {
        vec![CookieInstruction::NoOp]
    }
}
