//! JWT claims and token validation.
//!
//! Tokens are issued by the external identity layer; this service only
//! verifies them and exposes the claims the ledger core trusts.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::JwtConfig;

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (owner ID).
    pub sub: Uuid,
    /// Caller role, `customer` or `admin`.
    pub role: String,
    /// Whether the identity layer has verified this owner's identity.
    #[serde(default)]
    pub verified: bool,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for an owner.
    #[must_use]
    pub fn new(owner_id: Uuid, role: &str, verified: bool, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: owner_id,
            role: role.to_string(),
            verified,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the owner ID from claims.
    #[must_use]
    pub const fn owner_id(&self) -> Uuid {
        self.sub
    }
}

/// Errors that can occur during JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Token encoding failed.
    #[error("failed to encode token: {0}")]
    EncodingError(String),

    /// Token decoding failed.
    #[error("failed to decode token: {0}")]
    DecodingError(String),

    /// Token has expired.
    #[error("token has expired")]
    Expired,

    /// Token is invalid.
    #[error("invalid token")]
    Invalid,
}

/// JWT service for token operations.
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish_non_exhaustive()
    }
}

impl JwtService {
    /// Creates a new JWT service with the given configuration.
    #[must_use]
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Generates an access token for an owner.
    ///
    /// Used by tests and tooling; in production the identity layer issues
    /// tokens with the same secret.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn generate_token(
        &self,
        owner_id: Uuid,
        role: &str,
        verified: bool,
    ) -> Result<String, JwtError> {
        #[allow(clippy::cast_possible_wrap)]
        let expires_at = Utc::now() + Duration::seconds(self.config.access_token_expiry_secs as i64);
        let claims = Claims::new(owner_id, role, verified, expires_at);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }

    /// Validates and decodes a token.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` if the token has expired.
    /// Returns `JwtError::DecodingError` if the token is malformed.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let validation = Validation::default();

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::DecodingError(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new(JwtConfig {
            secret: "test-secret".to_string(),
            access_token_expiry_secs: 900,
        })
    }

    #[test]
    fn test_roundtrip() {
        let svc = service();
        let owner = Uuid::new_v4();
        let token = svc.generate_token(owner, "customer", true).unwrap();
        let claims = svc.validate_token(&token).unwrap();

        assert_eq!(claims.owner_id(), owner);
        assert_eq!(claims.role, "customer");
        assert!(claims.verified);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = service()
            .generate_token(Uuid::new_v4(), "customer", false)
            .unwrap();

        let other = JwtService::new(JwtConfig {
            secret: "other-secret".to_string(),
            access_token_expiry_secs: 900,
        });
        assert!(matches!(
            other.validate_token(&token),
            Err(JwtError::DecodingError(_))
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(service().validate_token("not-a-jwt").is_err());
    }
}
