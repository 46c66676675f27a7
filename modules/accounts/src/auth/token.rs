use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims embedded in bearer tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject — the user's email.
    pub sub: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiry (unix timestamp).
    pub exp: i64,
}

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Invalid token format")]
    Invalid,
    #[error("Failed to sign token: {0}")]
    Signing(String),
}

/// Issues and validates HS256-signed, time-limited bearer tokens carrying
/// the user's email claim.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_minutes: i64,
}

impl TokenCodec {
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_minutes,
        }
    }

    /// Sign a token for `email` expiring after the configured TTL.
    pub fn issue(&self, email: &str) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: email.to_string(),
            iat: now,
            exp: now + self.ttl_minutes * 60,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Validate signature and expiry; returns the embedded email.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims.sub)
            .map_err(|_| TokenError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_and_verify_roundtrip() {
        let codec = TokenCodec::new("test-secret", 60);
        let token = codec.issue("vet@example.com").unwrap();
        let email = codec.verify(&token).unwrap();
        assert_eq!(email, "vet@example.com");
    }

    #[test]
    fn verify_rejects_garbage() {
        let codec = TokenCodec::new("test-secret", 60);
        assert!(matches!(
            codec.verify("not-a-token"),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let codec = TokenCodec::new("test-secret", 60);
        let other = TokenCodec::new("other-secret", 60);
        let token = codec.issue("vet@example.com").unwrap();
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_expired() {
        let codec = TokenCodec::new("test-secret", -5);
        let token = codec.issue("vet@example.com").unwrap();
        assert!(codec.verify(&token).is_err());
    }
}
