use axum::http::{header, HeaderMap};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{SessionConfig, MAX_SESSION_DAYS};

/// Claims carried in the session cookie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// The signed-in user's email
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    pub fn new(email: &str, max_age: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: email.to_string(),
            iat: now.timestamp(),
            exp: (now + max_age).timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session secret is not configured")]
    InvalidSecret,
    #[error("session token generation failed: {0}")]
    TokenGeneration(String),
    #[error("invalid session token: {0}")]
    InvalidToken(String),
}

/// Signs, verifies and (de)serializes the session cookie
#[derive(Clone)]
pub struct SessionCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    cookie_name: String,
    max_age: Duration,
    secure: bool,
}

impl std::fmt::Debug for SessionCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCodec")
            .field("cookie_name", &self.cookie_name)
            .field("max_age", &self.max_age)
            .field("secure", &self.secure)
            .finish_non_exhaustive()
    }
}

impl SessionCodec {
    pub fn new(secret: &str, cookie_name: impl Into<String>, max_age_days: i64, secure: bool) -> Result<Self, SessionError> {
        if secret.is_empty() {
            return Err(SessionError::InvalidSecret);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            cookie_name: cookie_name.into(),
            max_age: Duration::days(max_age_days.clamp(1, MAX_SESSION_DAYS)),
            secure,
        })
    }

    pub fn from_config(config: &SessionConfig) -> Result<Self, SessionError> {
        Self::new(&config.secret, config.cookie_name.clone(), config.max_age_days(), config.secure_cookie)
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn max_age_secs(&self) -> i64 {
        self.max_age.num_seconds()
    }

    /// Sign a fresh session for `email`
    pub fn issue(&self, email: &str) -> Result<String, SessionError> {
        let claims = SessionClaims::new(email, self.max_age);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| SessionError::TokenGeneration(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<SessionClaims, SessionError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| SessionError::InvalidToken(e.to_string()))
    }

    /// Email of the current session, or `None` when the cookie is missing,
    /// tampered with, or expired.
    pub fn read(&self, headers: &HeaderMap) -> Option<String> {
        let token = cookie_value(headers, &self.cookie_name)?;
        match self.verify(&token) {
            Ok(claims) if !claims.sub.is_empty() => Some(claims.sub),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!("Ignoring session cookie: {}", e);
                None
            }
        }
    }

    /// `Set-Cookie` value that stores `token`
    pub fn set_cookie(&self, token: &str) -> String {
        self.cookie_header(token, self.max_age_secs())
    }

    /// `Set-Cookie` value that removes the session
    pub fn clear_cookie(&self) -> String {
        self.cookie_header("", 0)
    }

    fn cookie_header(&self, value: &str, max_age: i64) -> String {
        let mut cookie = format!(
            "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
            self.cookie_name, value, max_age
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

/// Find a cookie by name across every `Cookie` header
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn codec() -> SessionCodec {
        SessionCodec::new("test-secret", "user-session", 7, false).unwrap()
    }

    fn with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn rejects_empty_secret() {
        assert!(matches!(
            SessionCodec::new("", "user-session", 7, false),
            Err(SessionError::InvalidSecret)
        ));
    }

    #[test]
    fn issued_token_verifies() {
        let codec = codec();
        let token = codec.issue("user@x.com").unwrap();
        let claims = codec.verify(&token).unwrap();
        assert_eq!(claims.sub, "user@x.com");
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let other = SessionCodec::new("other-secret", "user-session", 7, false).unwrap();
        let token = other.issue("user@x.com").unwrap();
        assert!(codec().verify(&token).is_err());
    }

    #[test]
    fn out_of_range_lifetime_is_clamped() {
        let huge = SessionCodec::new("test-secret", "user-session", i64::MAX, false).unwrap();
        assert_eq!(huge.max_age_secs(), MAX_SESSION_DAYS * 86_400);
        assert!(huge.issue("user@x.com").is_ok());

        let negative = SessionCodec::new("test-secret", "user-session", -3, false).unwrap();
        assert_eq!(negative.max_age_secs(), 86_400);
    }

    #[test]
    fn expired_token_is_rejected() {
        let codec = codec();
        let claims = SessionClaims {
            sub: "user@x.com".to_string(),
            iat: Utc::now().timestamp() - 3600,
            exp: Utc::now().timestamp() - 600,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &codec.encoding_key).unwrap();
        assert!(codec.verify(&token).is_err());
    }

    #[test]
    fn reads_session_from_cookie_header() {
        let codec = codec();
        let token = codec.issue("user@x.com").unwrap();
        let headers = with_cookie(&format!("theme=dark; user-session={}; other=1", token));
        assert_eq!(codec.read(&headers).as_deref(), Some("user@x.com"));
    }

    #[test]
    fn missing_or_garbage_cookie_reads_as_anonymous() {
        let codec = codec();
        assert_eq!(codec.read(&HeaderMap::new()), None);
        assert_eq!(codec.read(&with_cookie("user-session=not-a-token")), None);
        assert_eq!(codec.read(&with_cookie("user-session=")), None);
    }

    #[test]
    fn cookie_attributes() {
        let codec = codec();
        assert_eq!(
            codec.set_cookie("abc"),
            "user-session=abc; HttpOnly; SameSite=Lax; Path=/; Max-Age=604800"
        );
        assert_eq!(codec.clear_cookie(), "user-session=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0");

        let secure = SessionCodec::new("s", "user-session", 7, true).unwrap();
        assert!(secure.set_cookie("abc").ends_with("; Secure"));
    }
}
