//! # JWT Token Management
//!
//! HS256 access tokens carrying the user id as `sub`. Validation is
//! stateless; the extractor resolves the user afterwards.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{CatalogError, Result};

pub const TOKEN_EXPIRED: &str = "Token has expired";
pub const INVALID_TOKEN: &str = "Invalid token";

/// JWT claims for access tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at timestamp (Unix epoch seconds)
    pub iat: i64,
    /// Expiration timestamp (Unix epoch seconds)
    pub exp: i64,
    /// Unique token id
    pub jti: String,
}

impl Claims {
    /// The user id named by `sub`.
    ///
    /// # Errors
    ///
    /// `Invalid token` when `sub` is not an integer id.
    pub fn user_id(&self) -> Result<i32> {
        self.sub
            .parse()
            .map_err(|_| CatalogError::unauthorized(INVALID_TOKEN))
    }
}

/// JWT manager for token generation and validation
#[derive(Clone)]
pub struct JwtManager {
    ttl: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtManager")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl JwtManager {
    #[must_use]
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            ttl,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Generate an access token for a user
    ///
    /// # Errors
    ///
    /// Internal error when signing fails or the expiry is out of range.
    pub fn issue(&self, user_id: i32) -> Result<String> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| CatalogError::internal("token expiry out of range"))?;
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| CatalogError::internal(format!("token signing failed: {e}")))
    }

    /// Validate an access token and extract claims
    ///
    /// # Errors
    ///
    /// `Token has expired` past `exp`, `Invalid token` for anything else
    /// that fails to decode or verify.
    pub fn validate(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => CatalogError::unauthorized(TOKEN_EXPIRED),
                _ => CatalogError::unauthorized(INVALID_TOKEN),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> JwtManager {
        JwtManager::new("test_secret_key_for_testing_only", Duration::minutes(15))
    }

    #[test]
    fn test_issue_and_validate() {
        let manager = manager();
        let token = manager.issue(42).unwrap();
        let claims = manager.validate(&token).unwrap();
        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.exp - claims.iat, 15 * 60);
        assert!(Uuid::parse_str(&claims.jti).is_ok());
    }

    #[test]
    fn test_each_token_has_a_fresh_jti() {
        let manager = manager();
        let first = manager.validate(&manager.issue(1).unwrap()).unwrap();
        let second = manager.validate(&manager.issue(1).unwrap()).unwrap();
        assert_ne!(first.jti, second.jti);
    }

    #[test]
    fn test_expired_token() {
        let expired = JwtManager::new("test_secret_key_for_testing_only", Duration::minutes(-5));
        let token = expired.issue(1).unwrap();
        let err = manager().validate(&token).unwrap_err();
        assert_eq!(err.to_string(), TOKEN_EXPIRED);
    }

    #[test]
    fn test_expiry_out_of_range() {
        let manager = JwtManager::new("test_secret_key_for_testing_only", Duration::MAX);
        let err = manager.issue(1).unwrap_err();
        assert!(matches!(err, CatalogError::Internal(_)));
    }

    #[test]
    fn test_wrong_secret() {
        let other = JwtManager::new("another_secret", Duration::minutes(15));
        let token = other.issue(1).unwrap();
        let err = manager().validate(&token).unwrap_err();
        assert_eq!(err.to_string(), INVALID_TOKEN);
    }

    #[test]
    fn test_garbage_token() {
        let err = manager().validate("not.a.token").unwrap_err();
        assert!(matches!(err, CatalogError::Unauthorized(_)));
        assert_eq!(err.to_string(), INVALID_TOKEN);
    }

    #[test]
    fn test_non_numeric_subject() {
        let claims = Claims {
            sub: "alice".into(),
            iat: 0,
            exp: 0,
            jti: String::new(),
        };
        assert_eq!(claims.user_id().unwrap_err().to_string(), INVALID_TOKEN);
    }
}
