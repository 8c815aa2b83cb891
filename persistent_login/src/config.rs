//! Central configuration for the persistent_login crate

use std::sync::LazyLock;

use crate::policy::TimestampBound;

/// Feature flag for the whole session extension policy
///
/// Any value other than "false" (case-insensitive) keeps the policy enabled.
/// Default: true
pub static PERSISTENT_LOGIN_ENABLED: LazyLock<bool> = LazyLock::new(|| {
    parse_enabled(std::env::var("PERSISTENT_LOGIN_ENABLED").ok().as_deref())
});

/// Name of the host framework's native session cookie
/// Default: "__Host-SessionId"
pub static SESSION_COOKIE_NAME: LazyLock<String> = LazyLock::new(|| {
    std::env::var("SESSION_COOKIE_NAME")
        .ok()
        .unwrap_or("__Host-SessionId".to_string())
});

/// Name of the marker cookie that throttles re-issuance of the session cookie
/// Default: "__Host-LoggedInForever"
pub static MARKER_COOKIE_NAME: LazyLock<String> = LazyLock::new(|| {
    std::env::var("PERSISTENT_LOGIN_MARKER_COOKIE")
        .ok()
        .unwrap_or("__Host-LoggedInForever".to_string())
});

/// Role a user must hold to receive a long-lived session
/// Default: "customer"
pub static QUALIFYING_ROLE: LazyLock<String> = LazyLock::new(|| {
    std::env::var("PERSISTENT_LOGIN_ROLE")
        .ok()
        .unwrap_or("customer".to_string())
});

/// Width of the timestamps the expiry is computed in ("32" or "64")
/// Default: 64
pub static TIMESTAMP_BOUND: LazyLock<TimestampBound> = LazyLock::new(|| {
    parse_timestamp_bound(
        std::env::var("PERSISTENT_LOGIN_TIMESTAMP_BOUND")
            .ok()
            .as_deref(),
    )
});

/// Lifetime of a freshly logged-in session before it gets extended
/// Default: 600 seconds
pub static SESSION_COOKIE_MAX_AGE: LazyLock<u64> = LazyLock::new(|| {
    std::env::var("SESSION_COOKIE_MAX_AGE")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(600) // Default to 10 minutes if not set or invalid
});

/// Marker cookie lifetime. One day, so the session cookie is re-issued at most daily.
pub const MARKER_MAX_AGE: i64 = 86400;

/// Constant sentinel stored in the marker cookie. Only its presence matters.
pub const MARKER_COOKIE_VALUE: &str = "1";

fn parse_enabled(value: Option<&str>) -> bool {
    value.map(|val| val.to_lowercase() != "false").unwrap_or(true)
}

fn parse_timestamp_bound(value: Option<&str>) -> TimestampBound {
    match value.map(str::trim) {
        Some("32") => TimestampBound::Signed32,
        Some("64") | None => TimestampBound::Signed64,
        Some(other) => {
            tracing::warn!(
                "Unsupported PERSISTENT_LOGIN_TIMESTAMP_BOUND '{}', falling back to 64",
                other
            );
            TimestampBound::Signed64
        }
    }
}

/// Names of the two cookies the policy works with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieNames {
    /// The native long-lived session cookie
    pub session: String,
    /// The 24h marker cookie
    pub marker: String,
}

impl CookieNames {
    pub fn new(session: impl Into<String>, marker: impl Into<String>) -> Self {
        Self {
            session: session.into(),
            marker: marker.into(),
        }
    }

    /// Cookie names as configured through the environment
    pub fn from_env() -> Self {
        Self::new(SESSION_COOKIE_NAME.as_str(), MARKER_COOKIE_NAME.as_str())
    }
}

impl Default for CookieNames {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    /// Helper function to set an environment variable for the duration of the test
    /// and restore the original value afterward.
    fn with_env_var<F, R>(key: &str, value: Option<&str>, test: F) -> R
    where
        F: FnOnce() -> R,
    {
        let original = env::var(key).ok();

        match value {
            Some(val) => unsafe { env::set_var(key, val) },
            None => unsafe { env::remove_var(key) },
        }

        let result = test();

        match original {
            Some(val) => unsafe { env::set_var(key, val) },
            None => unsafe { env::remove_var(key) },
        }

        result
    }

    #[test]
    fn test_parse_enabled() {
        assert!(parse_enabled(None));
        assert!(parse_enabled(Some("true")));
        assert!(parse_enabled(Some("anything")));
        assert!(!parse_enabled(Some("false")));
        assert!(!parse_enabled(Some("FALSE")));
    }

    #[test]
    fn test_parse_timestamp_bound() {
        assert_eq!(parse_timestamp_bound(None), TimestampBound::Signed64);
        assert_eq!(parse_timestamp_bound(Some("64")), TimestampBound::Signed64);
        assert_eq!(parse_timestamp_bound(Some(" 32 ")), TimestampBound::Signed32);
        // Unknown widths fall back to the default
        assert_eq!(parse_timestamp_bound(Some("16")), TimestampBound::Signed64);
    }

    #[test]
    #[serial]
    fn test_enabled_from_env() {
        with_env_var("PERSISTENT_LOGIN_ENABLED", Some("False"), || {
            let enabled = parse_enabled(env::var("PERSISTENT_LOGIN_ENABLED").ok().as_deref());
            assert!(!enabled);
        });

        with_env_var("PERSISTENT_LOGIN_ENABLED", None, || {
            let enabled = parse_enabled(env::var("PERSISTENT_LOGIN_ENABLED").ok().as_deref());
            assert!(enabled);
        });
    }

    #[test]
    #[serial]
    fn test_marker_cookie_name_from_env() {
        // Default value
        with_env_var("PERSISTENT_LOGIN_MARKER_COOKIE", None, || {
            let name = env::var("PERSISTENT_LOGIN_MARKER_COOKIE")
                .ok()
                .unwrap_or("__Host-LoggedInForever".to_string());
            assert_eq!(name, "__Host-LoggedInForever");
        });

        // Custom value
        with_env_var("PERSISTENT_LOGIN_MARKER_COOKIE", Some("forever"), || {
            let name = env::var("PERSISTENT_LOGIN_MARKER_COOKIE")
                .ok()
                .unwrap_or("__Host-LoggedInForever".to_string());
            assert_eq!(name, "forever");
        });
    }

    #[test]
    #[serial]
    fn test_session_cookie_max_age_from_env() {
        with_env_var("SESSION_COOKIE_MAX_AGE", Some("invalid"), || {
            let max_age: u64 = env::var("SESSION_COOKIE_MAX_AGE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(600);
            assert_eq!(max_age, 600); // Should fall back to default
        });

        with_env_var("SESSION_COOKIE_MAX_AGE", Some("1800"), || {
            let max_age: u64 = env::var("SESSION_COOKIE_MAX_AGE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(600);
            assert_eq!(max_age, 1800);
        });
    }

    #[test]
    fn test_cookie_names_new() {
        let names = CookieNames::new("sid", "marker");
        assert_eq!(names.session, "sid");
        assert_eq!(names.marker, "marker");
    }
}
