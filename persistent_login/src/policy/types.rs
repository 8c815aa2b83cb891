/// Request-scoped facts the policy decides on.
///
/// Built fresh for every request from the identity provider and the request
/// cookies. Missing or malformed cookie data is represented as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub is_authenticated: bool,
    /// Primary role of the current user, if any
    pub user_role: Option<String>,
    pub marker_cookie_present: bool,
    /// Raw value of the native session cookie as sent by the client
    pub session_cookie_raw_value: Option<String>,
}

/// A cookie write produced by the policy and carried out by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieInstruction {
    /// Expire the marker cookie so the client drops it
    ExpireMarker,
    /// Re-issue the native session cookie with the given lifetime in seconds
    IssueLongLivedSession(i64),
    /// Set the marker cookie with the given lifetime in seconds
    IssueMarker(i64),
    NoOp,
}

/// Largest expiry timestamp the downstream cookie machinery can represent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimestampBound {
    /// 32-bit signed seconds, ends 2038-01-19T03:14:07Z
    Signed32,
    #[default]
    Signed64,
}

impl TimestampBound {
    pub fn max_timestamp(self) -> i64 {
        match self {
            TimestampBound::Signed32 => i32::MAX as i64,
            TimestampBound::Signed64 => i64::MAX,
        }
    }
}
