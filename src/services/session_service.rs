use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Name of the cookie carrying the signed session token
pub const SESSION_COOKIE: &str = "session";

/// Payload of the session token
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Authenticated username, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Nonce of the account `sub` named when the token was issued
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    /// One-time message to show on the next rendered page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flash: Option<String>,
    pub exp: i64,
}

/// Signs and verifies session tokens
pub struct SessionService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl SessionService {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Lifetime of an issued token in seconds
    pub fn ttl_secs(&self) -> i64 {
        self.ttl.num_seconds()
    }

    /// Sign `claims`, stamping a fresh expiry
    pub fn issue(&self, claims: SessionClaims) -> Result<String> {
        let claims = SessionClaims {
            exp: (Utc::now() + self.ttl).timestamp(),
            ..claims
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Session(e.to_string()))
    }

    /// Verify a token. Forged, expired and garbled tokens all yield `None`.
    pub fn read(&self, token: &str) -> Option<SessionClaims> {
        match decode::<SessionClaims>(token, &self.decoding_key, &Validation::default()) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                tracing::debug!("Ignoring invalid session token: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(sub: Option<&str>, flash: Option<&str>) -> SessionClaims {
        SessionClaims {
            sub: sub.map(str::to_string),
            nonce: sub.map(|_| "n0nce".to_string()),
            flash: flash.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_issue_and_read() {
        let service = SessionService::new("secret", 1);
        let token = service.issue(claims(Some("alice"), Some("hello"))).unwrap();

        let claims = service.read(&token).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("alice"));
        assert_eq!(claims.nonce.as_deref(), Some("n0nce"));
        assert_eq!(claims.flash.as_deref(), Some("hello"));
    }

    #[test]
    fn test_anonymous_token() {
        let service = SessionService::new("secret", 1);
        let token = service.issue(claims(None, Some("See you later!"))).unwrap();

        let claims = service.read(&token).unwrap();
        assert_eq!(claims.sub, None);
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let ours = SessionService::new("secret", 1);
        let theirs = SessionService::new("other-secret", 1);
        let token = theirs.issue(claims(Some("mallory"), None)).unwrap();

        assert!(ours.read(&token).is_none());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = SessionService::new("secret", -1);
        let token = service.issue(claims(Some("alice"), None)).unwrap();

        assert!(service.read(&token).is_none());
    }

    #[test]
    fn test_garbage_is_rejected() {
        let service = SessionService::new("secret", 1);
        assert!(service.read("not.a.token").is_none());
        assert!(service.read("").is_none());
    }
}
