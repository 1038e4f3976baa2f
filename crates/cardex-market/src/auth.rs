//! JWT authentication module.
//!
//! Handles token issuance and verification for authenticated operations.
//!
//! Tokens are HS256-signed with a fixed lifetime (60 minutes by default).
//! Verification failures are deliberately uniform: a malformed, tampered,
//! or expired token all produce the same `Unauthenticated` error, so a
//! caller cannot distinguish "expired" from "never valid".

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account id)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique identifier for this token)
    pub jti: String,
}

/// JWT token manager.
pub struct JwtManager {
    secret: String,
    token_lifetime_secs: i64,
}

impl JwtManager {
    /// Create a new JWT manager.
    pub fn new(secret: String, token_lifetime_secs: i64) -> Self {
        JwtManager {
            secret,
            token_lifetime_secs,
        }
    }

    /// Issue a signed token for an account.
    pub fn issue(&self, account_id: &str) -> Result<String, ApiError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.token_lifetime_secs);

        let claims = Claims {
            sub: account_id.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ApiError::internal(format!("Failed to issue token: {}", e)))
    }

    /// Verify a token and return its claims.
    ///
    /// ## Errors
    /// `Unauthenticated` with an identical message for every failure mode:
    /// bad signature, malformed token, or expired token.
    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        let validation = Validation::default();

        let token_data: TokenData<Claims> = decode(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|_| ApiError::unauthenticated("Invalid or expired token"))?;

        Ok(token_data.claims)
    }

    /// Verify a token and return the account id it was issued for.
    pub fn verify_account_id(&self, token: &str) -> Result<String, ApiError> {
        Ok(self.verify(token)?.sub)
    }
}

/// Extract bearer token from an authorization header value.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_jwt_roundtrip() {
        let manager = JwtManager::new("test-secret".to_string(), 3600);

        let token = manager.issue("acct-001").unwrap();
        let claims = manager.verify(&token).unwrap();

        assert_eq!(claims.sub, "acct-001");
        assert!(claims.exp > claims.iat);
        assert_eq!(manager.verify_account_id(&token).unwrap(), "acct-001");
    }

    #[test]
    fn test_garbage_token_rejected() {
        let manager = JwtManager::new("test-secret".to_string(), 3600);

        let err = manager.verify("not-a-token").unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthenticated);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = JwtManager::new("secret-a".to_string(), 3600);
        let verifier = JwtManager::new("secret-b".to_string(), 3600);

        let token = issuer.issue("acct-001").unwrap();
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn test_expired_token_indistinguishable_from_invalid() {
        // A lifetime far enough in the past to clear the default leeway.
        let expired_issuer = JwtManager::new("test-secret".to_string(), -3600);
        let manager = JwtManager::new("test-secret".to_string(), 3600);

        let expired = expired_issuer.issue("acct-001").unwrap();
        let expired_err = manager.verify(&expired).unwrap_err();
        let garbage_err = manager.verify("garbage").unwrap_err();

        // Same code, same message: no expired-vs-invalid oracle.
        assert_eq!(expired_err.code, garbage_err.code);
        assert_eq!(expired_err.message, garbage_err.message);
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
        assert_eq!(extract_bearer_token(""), None);
    }
}
