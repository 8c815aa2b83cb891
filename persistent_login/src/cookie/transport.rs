use chrono::{DateTime, Duration, Utc};
use headers::HeaderMapExt;
use http::header::{HeaderMap, HeaderValue, SET_COOKIE};

use crate::config::{CookieNames, MARKER_COOKIE_VALUE};
use crate::policy::CookieInstruction;
use crate::provider::IssuedSession;

use super::errors::CookieError;

const COOKIE_ATTRIBUTES: &str = "SameSite=Lax; Secure; HttpOnly; Path=/";

fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

fn append_set_cookie(headers: &mut HeaderMap, cookie: String) -> Result<(), CookieError> {
    let value = HeaderValue::from_str(&cookie)
        .map_err(|_| CookieError::Header(format!("Invalid Set-Cookie value: {cookie}")))?;
    headers.append(SET_COOKIE, value);
    Ok(())
}

/// Appends a `Set-Cookie` header for a cookie living `max_age` seconds
pub fn set_cookie_header(
    headers: &mut HeaderMap,
    name: &str,
    value: &str,
    max_age: i64,
) -> Result<(), CookieError> {
    append_set_cookie(
        headers,
        format!("{name}={value}; {COOKIE_ATTRIBUTES}; Max-Age={max_age}"),
    )
}

/// Appends a `Set-Cookie` header that makes the client drop the cookie
pub fn expire_cookie_header(headers: &mut HeaderMap, name: &str) -> Result<(), CookieError> {
    let expired_at = Utc::now() - Duration::minutes(15);
    append_set_cookie(
        headers,
        format!(
            "{name}=; {COOKIE_ATTRIBUTES}; Max-Age=0; Expires={}",
            http_date(expired_at)
        ),
    )
}

/// Value of a request cookie. A missing or unparsable `Cookie` header yields `None`.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookies = headers.typed_get::<headers::Cookie>()?;
    cookies.get(name).map(str::to_string)
}

/// Whether the marker cookie was sent with the request
pub fn marker_present(headers: &HeaderMap, marker_name: &str) -> bool {
    cookie_value(headers, marker_name).is_some()
}

/// Maps policy instructions onto `Set-Cookie` headers.
///
/// `issued` supplies the session value for
/// [`CookieInstruction::IssueLongLivedSession`]. [`CookieInstruction::NoOp`]
/// writes nothing.
pub fn apply_instructions(
    instructions: &[CookieInstruction],
    issued: Option<&IssuedSession>,
    names: &CookieNames,
) -> Result<HeaderMap, CookieError> {
    let mut headers = HeaderMap::new();

    for instruction in instructions {
        match *instruction {
            CookieInstruction::ExpireMarker => {
                expire_cookie_header(&mut headers, &names.marker)?;
            }
            CookieInstruction::IssueLongLivedSession(duration_seconds) => {
                let issued = issued.ok_or(CookieError::MissingSession)?;
                set_cookie_header(&mut headers, &names.session, &issued.value, duration_seconds)?;
            }
            CookieInstruction::IssueMarker(duration_seconds) => {
                set_cookie_header(
                    &mut headers,
                    &names.marker,
                    MARKER_COOKIE_VALUE,
                    duration_seconds,
                )?;
            }
            CookieInstruction::NoOp => {}
        }
    }

    tracing::trace!("Cookie headers: {:?}", headers);
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::COOKIE;

    fn names() -> CookieNames {
        CookieNames::new("sid", "forever")
    }

    fn set_cookies(headers: &HeaderMap) -> Vec<String> {
        headers
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().expect("set-cookie is ascii").to_string())
            .collect()
    }

    fn issued(value: &str, max_age: i64) -> IssuedSession {
        IssuedSession {
            value: value.to_string(),
            expires_at: Utc::now() + Duration::seconds(max_age),
            max_age,
        }
    }

    #[test]
    fn test_set_cookie_header() {
        let mut headers = HeaderMap::new();
        set_cookie_header(&mut headers, "forever", "1", 86400).expect("header is valid");

        assert_eq!(
            set_cookies(&headers),
            vec!["forever=1; SameSite=Lax; Secure; HttpOnly; Path=/; Max-Age=86400"]
        );
    }

    #[test]
    fn test_set_cookie_header_rejects_invalid_value() {
        let mut headers = HeaderMap::new();
        let result = set_cookie_header(&mut headers, "sid", "bad\nvalue", 60);

        assert!(matches!(result, Err(CookieError::Header(_))));
        assert!(headers.is_empty());
    }

    #[test]
    fn test_expire_cookie_header() {
        let mut headers = HeaderMap::new();
        expire_cookie_header(&mut headers, "forever").expect("header is valid");

        let cookies = set_cookies(&headers);
        assert_eq!(cookies.len(), 1);
        assert!(cookies[0].starts_with("forever=; "));
        assert!(cookies[0].contains("Path=/"));
        assert!(cookies[0].contains("Max-Age=0"));
        assert!(cookies[0].contains("Expires="));
        assert!(cookies[0].ends_with(" GMT"));
    }

    #[test]
    fn test_cookie_value_and_marker_present() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("sid=abc; forever=1"));

        assert_eq!(cookie_value(&headers, "sid"), Some("abc".to_string()));
        assert!(marker_present(&headers, "forever"));
        assert!(!marker_present(&headers, "other"));
    }

    #[test]
    fn test_missing_cookie_header_is_absent() {
        let headers = HeaderMap::new();
        assert_eq!(cookie_value(&headers, "sid"), None);
        assert!(!marker_present(&headers, "forever"));
    }

    #[test]
    fn test_apply_renewal_instructions() {
        let session = issued("fresh-token", 946_080_000);
        let headers = apply_instructions(
            &[
                CookieInstruction::IssueLongLivedSession(946_080_000),
                CookieInstruction::IssueMarker(86400),
            ],
            Some(&session),
            &names(),
        )
        .expect("instructions apply");

        let cookies = set_cookies(&headers);
        assert_eq!(cookies.len(), 2);
        assert!(cookies[0].starts_with("sid=fresh-token; "));
        assert!(cookies[0].ends_with("Max-Age=946080000"));
        assert!(cookies[1].starts_with("forever=1; "));
        assert!(cookies[1].ends_with("Max-Age=86400"));
    }

    #[test]
    fn test_apply_expire_marker() {
        let headers = apply_instructions(&[CookieInstruction::ExpireMarker], None, &names())
            .expect("instructions apply");

        let cookies = set_cookies(&headers);
        assert_eq!(cookies.len(), 1);
        assert!(cookies[0].starts_with("forever=; "));
    }

    #[test]
    fn test_apply_noop_writes_nothing() {
        let headers = apply_instructions(&[CookieInstruction::NoOp], None, &names())
            .expect("instructions apply");
        assert!(headers.is_empty());
    }

    #[test]
    fn test_apply_session_without_issued_value() {
        let result = apply_instructions(
            &[CookieInstruction::IssueLongLivedSession(60)],
            None,
            &names(),
        );
        assert!(matches!(result, Err(CookieError::MissingSession)));
    }
}
