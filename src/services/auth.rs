//! Authentication service: password hashing and token handling
//!
//! Provides:
//! - Password hashing and verification with bcrypt
//! - Signed auth token issuing and validation
//!
//! Tokens are stateless HS256 JWTs binding the user id; validity is purely
//! cryptographic and time-bound, there is no revocation list.

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::ApiError;

/// Claims carried by an auth token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User ID (subject)
    pub sub: String,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

/// Auth service configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Token signing secret
    pub app_secret: String,
    /// Token lifetime in seconds
    pub token_lifetime: i64,
    /// Bcrypt cost factor
    pub bcrypt_cost: u32,
}

impl From<&Config> for AuthConfig {
    fn from(config: &Config) -> Self {
        Self {
            app_secret: config.app_secret.clone(),
            token_lifetime: config.token_lifetime_secs,
            bcrypt_cost: config.bcrypt_cost,
        }
    }
}

/// Authentication service, read-only after startup
#[derive(Clone)]
pub struct AuthService {
    config: AuthConfig,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Hash a password with bcrypt (per-call random salt)
    pub fn hash_password(&self, password: &str) -> Result<String, ApiError> {
        hash(password, self.config.bcrypt_cost)
            .map_err(|e| ApiError::Internal(format!("failed to hash password: {e}")))
    }

    /// Verify a password against a stored digest. A mismatch is `Ok(false)`,
    /// never an error; the comparison inside bcrypt is constant-time.
    pub fn verify_password(&self, password: &str, digest: &str) -> Result<bool, ApiError> {
        verify(password, digest)
            .map_err(|e| ApiError::Internal(format!("failed to verify password: {e}")))
    }

    /// Issue a signed token binding the given subject id
    pub fn issue_token(&self, subject_id: &str) -> Result<String, ApiError> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: subject_id.to_string(),
            exp: (now + Duration::seconds(self.config.token_lifetime)).timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.app_secret.as_bytes()),
        )
        .map_err(|e| ApiError::Internal(format!("failed to sign token: {e}")))
    }

    /// Validate a token and return the subject id it binds. Signature
    /// mismatch, malformed payload, and expiry all map to `InvalidAssertion`.
    pub fn validate_token(&self, token: &str) -> Result<String, ApiError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        let token_data = decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.config.app_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| {
            tracing::debug!(error = %e, "token validation failed");
            ApiError::InvalidAssertion
        })?;

        Ok(token_data.claims.sub)
    }
}
