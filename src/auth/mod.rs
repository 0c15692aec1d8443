pub mod password;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;

/// Claims carried inside a signed credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
    pub iat: i64,
    pub exp: i64,
}

/// Verified caller identity, valid for the duration of one request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub username: String,
    pub is_admin: bool,
    pub issued_at: DateTime<Utc>,
}

impl TryFrom<Claims> for Identity {
    type Error = JwtError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let issued_at = DateTime::from_timestamp(claims.iat, 0).ok_or(JwtError::InvalidClaims)?;
        Ok(Self {
            username: claims.username,
            is_admin: claims.is_admin,
            issued_at,
        })
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid JWT secret")]
    InvalidSecret,

    #[error("Invalid JWT claims")]
    InvalidClaims,
}

/// Signing and verification keys derived from the configured secret.
///
/// Built once at start-up and shared read-only through application state.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    expiry: Duration,
}

impl std::fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtKeys").field("expiry", &self.expiry).finish_non_exhaustive()
    }
}

impl JwtKeys {
    pub fn new(secret: &str, expiry_hours: u64) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::InvalidSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            expiry: Duration::hours(expiry_hours as i64),
        })
    }

    pub fn from_config(security: &SecurityConfig) -> Result<Self, JwtError> {
        Self::new(&security.jwt_secret, security.jwt_expiry_hours)
    }

    /// Issue a signed credential for `username`.
    pub fn sign(&self, username: &str, is_admin: bool) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            username: username.to_string(),
            is_admin,
            iat: now.timestamp(),
            exp: (now + self.expiry).timestamp(),
        };
        self.sign_claims(&claims)
    }

    pub fn sign_claims(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| JwtError::TokenGeneration(e.to_string()))
    }

    /// Verify signature and expiry, returning the identity the token carries.
    pub fn verify(&self, token: &str) -> Result<Identity, JwtError> {
        let token_data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        Identity::try_from(token_data.claims)
    }
}
