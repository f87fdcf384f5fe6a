//! Errors raised by registration, login and token handling.

use thiserror::Error;

use crate::auth::token::TokenError;
use crate::db::errors::DbError;
use crate::errors::Error;

/// Message returned for every login failure, whatever the cause
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid login or password";

/// Message returned for every rejected bearer token, whatever the cause
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid or expired token";

#[derive(Debug, Error)]
pub enum AuthError {
    /// Input the caller can fix (empty or oversized fields)
    #[error("{0}")]
    Validation(String),

    #[error("login {0} is already taken")]
    DuplicateLogin(String),

    /// Unknown login or wrong password; the two are deliberately indistinguishable
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password hashing primitive failed
    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Persistence(#[from] DbError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl From<AuthError> for Error {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(message) => Error::BadRequest { message },
            AuthError::DuplicateLogin(_) => Error::Conflict {
                message: "This login is already taken".to_string(),
            },
            AuthError::InvalidCredentials => Error::Unauthenticated {
                message: Some(INVALID_CREDENTIALS_MESSAGE.to_string()),
            },
            AuthError::Hashing(operation) => Error::Internal { operation },
            AuthError::Persistence(db) => Error::Database(db),
            AuthError::Token(TokenError::Signing(operation)) => Error::Internal { operation },
            AuthError::Token(_) => Error::Unauthenticated {
                message: Some(INVALID_TOKEN_MESSAGE.to_string()),
            },
        }
    }
}
