//! Session cookie helpers.

use axum::http::{
    header::{InvalidHeaderValue, COOKIE},
    HeaderMap, HeaderValue,
};

pub const SESSION_COOKIE_NAME: &str = "session";

/// Seven days.
pub const SESSION_MAX_AGE_SECONDS: u64 = 60 * 60 * 24 * 7;

/// Read the session token from the `Cookie` header. Empty values count as missing.
#[must_use]
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    for header in headers.get_all(COOKIE) {
        let Ok(value) = header.to_str() else {
            continue;
        };
        for pair in value.split(';') {
            let mut parts = pair.trim().splitn(2, '=');
            let (Some(key), Some(val)) = (parts.next(), parts.next()) else {
                continue;
            };
            if key.trim() == SESSION_COOKIE_NAME {
                let val = val.trim();
                return (!val.is_empty()).then(|| val.to_string());
            }
        }
    }
    None
}

/// Session ids must be cookie-octets so they cannot smuggle extra cookie attributes.
#[must_use]
pub fn valid_session_token(token: &str) -> bool {
    !token.is_empty()
        && token
            .bytes()
            .all(|b| b.is_ascii_graphic() && !matches!(b, b'"' | b',' | b';' | b'\\'))
}

fn cookie(value: &str, max_age: u64, secure: bool) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Build the `HttpOnly` cookie carrying the session token.
///
/// # Errors
/// Returns an error if the token contains bytes not allowed in a header value.
pub fn session_cookie(token: &str, secure: bool) -> Result<HeaderValue, InvalidHeaderValue> {
    cookie(token, SESSION_MAX_AGE_SECONDS, secure)
}

/// Same attributes as [`session_cookie`], expiring immediately.
///
/// # Errors
/// Never in practice; the value is built from constants.
pub fn clear_session_cookie(secure: bool) -> Result<HeaderValue, InvalidHeaderValue> {
    cookie("", 0, secure)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn headers(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn extracts_session_among_other_cookies() {
        let headers = headers("theme=dark; session=abc123; lang=en");
        assert_eq!(extract_session_token(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn ignores_similarly_named_cookies() {
        let headers = headers("session_id=nope; my_session=nope");
        assert_eq!(extract_session_token(&headers), None);
    }

    #[test]
    fn empty_session_is_missing() {
        assert_eq!(extract_session_token(&headers("session=")), None);
        assert_eq!(extract_session_token(&HeaderMap::new()), None);
    }

    #[test]
    fn session_cookie_attributes() {
        let cookie = session_cookie("abc123", false).unwrap();
        assert_eq!(
            cookie.to_str().unwrap(),
            "session=abc123; Path=/; HttpOnly; SameSite=Lax; Max-Age=604800"
        );

        let secure = session_cookie("abc123", true).unwrap();
        assert!(secure.to_str().unwrap().ends_with("; Secure"));
    }

    #[test]
    fn session_cookie_rejects_header_injection() {
        assert!(session_cookie("abc\r\nSet-Cookie: x=y", false).is_err());
    }

    #[test]
    fn session_token_charset() {
        assert!(valid_session_token("0b6f1c3e-8a2d-4c1b-9f7e-2d5a6b7c8d9e"));
        assert!(!valid_session_token(""));
        assert!(!valid_session_token("abc; Domain=evil.tld"));
        assert!(!valid_session_token("a b"));
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        let cookie = clear_session_cookie(false).unwrap();
        assert_eq!(
            cookie.to_str().unwrap(),
            "session=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"
        );
    }

    #[test]
    fn set_and_clear_share_attributes() {
        for secure in [false, true] {
            let set = session_cookie("abc123", secure).unwrap();
            let clear = clear_session_cookie(secure).unwrap();
            let attributes = |value: &HeaderValue| {
                let value = value.to_str().unwrap().to_string();
                value
                    .split("; ")
                    .skip(1)
                    .filter(|attr| !attr.starts_with("Max-Age="))
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            };
            assert_eq!(attributes(&set), attributes(&clear), "secure={secure}");
        }
    }
}
