use axum::http::HeaderMap;
use axum::http::header::COOKIE;

use surfbatch_core::SessionId;

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "surfbatch_sid";

/// Cookie configuration for the session id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub value: String,
    pub max_age_seconds: i64,
    pub secure: bool,
}

impl SessionCookie {
    /// Create a cookie for a freshly opened session
    pub fn new(id: &SessionId, max_age_seconds: i64, secure: bool) -> Self {
        Self {
            value: id.to_string(),
            max_age_seconds,
            secure,
        }
    }

    /// Create a cookie that clears the session id (for logout)
    pub fn clear(secure: bool) -> Self {
        Self {
            value: String::new(),
            max_age_seconds: 0,
            secure,
        }
    }

    /// Build the Set-Cookie header value
    pub fn to_header_value(&self) -> String {
        let mut parts = vec![
            format!("{SESSION_COOKIE}={}", self.value),
            format!("Max-Age={}", self.max_age_seconds),
            "Path=/".to_string(),
            "HttpOnly".to_string(),
            "SameSite=Lax".to_string(),
        ];

        if self.secure {
            parts.push("Secure".to_string());
        }

        parts.join("; ")
    }
}

/// Extract the session id from request cookies.
///
/// A missing or unparseable value reads as no session.
pub fn extract_session_id(headers: &HeaderMap) -> Option<SessionId> {
    let prefix = format!("{SESSION_COOKIE}=");
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookie_str| cookie_str.split(';'))
        .map(str::trim)
        .find_map(|s| s.strip_prefix(prefix.as_str()))
        .and_then(|raw| raw.parse().ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_to_header_value_insecure() {
        let id = SessionId::new();
        let cookie = SessionCookie::new(&id, 86_400, false);
        assert_eq!(
            cookie.to_header_value(),
            format!("surfbatch_sid={id}; Max-Age=86400; Path=/; HttpOnly; SameSite=Lax")
        );
    }

    #[test]
    fn test_to_header_value_secure() {
        let cookie = SessionCookie::new(&SessionId::new(), 86_400, true);
        assert!(cookie.to_header_value().ends_with("; Secure"));
    }

    #[test]
    fn test_clear_expires_immediately() {
        let cookie = SessionCookie::clear(false);
        assert_eq!(
            cookie.to_header_value(),
            "surfbatch_sid=; Max-Age=0; Path=/; HttpOnly; SameSite=Lax"
        );
    }

    #[test]
    fn test_extract_session_id_among_other_cookies() {
        let id = SessionId::new();
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            format!("theme=dark; surfbatch_sid={id}; other=value")
                .parse()
                .unwrap(),
        );
        assert_eq!(extract_session_id(&headers), Some(id));
    }

    #[test]
    fn test_extract_session_id_missing_or_garbage() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_session_id(&headers), None);

        headers.insert(COOKIE, "surfbatch_sid=not-a-uuid".parse().unwrap());
        assert_eq!(extract_session_id(&headers), None);
    }
}
