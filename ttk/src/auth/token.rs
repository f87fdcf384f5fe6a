//! Bearer token issuance and verification.
//!
//! Tokens are HS256 JWTs carrying the caller's identity (`uid`, `login`, `name`) and an
//! absolute expiry. They are never persisted: a valid signature and an unexpired `exp` are the
//! whole proof of authentication. Rotating the secret invalidates every outstanding token.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::api::models::users::CurrentUser;

/// Token claims
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub uid: String,   // User ID
    pub login: String, // Login handle
    pub name: String,  // Display name
    pub exp: i64,      // Expiration time
    pub iat: i64,      // Issued at
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Signature does not match the payload under our secret (tampering or a different secret)
    #[error("token signature is invalid")]
    InvalidSignature,

    /// Not a structurally valid token
    #[error("token is malformed")]
    Malformed,

    /// Signature is valid but `exp` is in the past
    #[error("token has expired")]
    Expired,

    /// Encoding or key failure while issuing
    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,

            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_)
            | ErrorKind::MissingRequiredClaim(_)
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::MissingAlgorithm
            | ErrorKind::ImmatureSignature
            | ErrorKind::InvalidIssuer
            | ErrorKind::InvalidAudience
            | ErrorKind::InvalidSubject => TokenError::Malformed,

            // Key and crypto backend failures are ours, not the caller's
            _ => TokenError::Signing(e.to_string()),
        }
    }
}

/// Signs and verifies bearer tokens with a process-wide secret.
///
/// Built once at startup from configuration and shared read-only by every request.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Create a codec signing with `secret`, issuing tokens that live for `ttl`.
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact: a token is rejected the second its exp has passed
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// The lifetime applied by [`TokenCodec::issue`]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `identity` with the configured lifetime
    pub fn issue(&self, identity: &CurrentUser) -> Result<String, TokenError> {
        self.issue_with_ttl(identity, self.ttl)
    }

    /// Issue a token expiring `ttl` from now. A negative `ttl` yields an already expired token.
    pub fn issue_with_ttl(&self, identity: &CurrentUser, ttl: Duration) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            uid: identity.id.to_string(),
            login: identity.login.clone(),
            name: identity.display_name.clone(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify signature then expiry, and decode the identity.
    pub fn verify(&self, token: &str) -> Result<CurrentUser, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        let id = Uuid::parse_str(&data.claims.uid).map_err(|_| TokenError::Malformed)?;

        Ok(CurrentUser {
            id,
            login: data.claims.login,
            display_name: data.claims.name,
        })
    }
}
