//! Registration and login.
//!
//! [`AuthService`] owns the credential rules: passwords are hashed with Argon2id before they
//! reach storage, and login failures never reveal whether the login exists.

use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::{
    api::models::users::{CurrentUser, Role},
    auth::{
        errors::AuthError,
        password::{self, Argon2Params},
        token::TokenCodec,
    },
    config::PasswordConfig,
    db::{
        handlers::UserRepository,
        models::users::{UserCreateDBRequest, UserDBResponse},
    },
};

/// Maximum login length accepted by storage
const MAX_LOGIN_LENGTH: usize = 50;
/// Maximum display name length accepted by storage
const MAX_DISPLAY_NAME_LENGTH: usize = 100;

/// Length bounds and hashing cost for passwords
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub max_length: usize,
    pub argon2: Argon2Params,
}

impl From<&PasswordConfig> for PasswordPolicy {
    fn from(config: &PasswordConfig) -> Self {
        Self {
            min_length: config.min_length,
            max_length: config.max_length,
            argon2: Argon2Params::from(config),
        }
    }
}

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub user: UserDBResponse,
}

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: TokenCodec,
    policy: PasswordPolicy,
    /// Verified against when the login is unknown, so both failure paths cost the same
    dummy_hash: String,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, tokens: TokenCodec, policy: PasswordPolicy) -> Result<Self, AuthError> {
        let dummy_hash = password::hash_password("dummy-password-for-unknown-logins", policy.argon2)?;
        Ok(Self {
            users,
            tokens,
            policy,
            dummy_hash,
        })
    }

    pub fn tokens(&self) -> &TokenCodec {
        &self.tokens
    }

    /// Hash the password and persist a new `USER`.
    #[instrument(skip(self, display_name, password), fields(login = %login), err)]
    pub async fn register(&self, login: &str, display_name: &str, password: &str) -> Result<UserDBResponse, AuthError> {
        self.check_inputs(login, display_name, password)?;

        let password_hash = password::hash_password_blocking(password.to_string(), self.policy.argon2).await?;

        let request = UserCreateDBRequest {
            login: login.to_string(),
            display_name: display_name.to_string(),
            password_hash,
            role: Role::User,
        };

        match self.users.create(&request).await {
            Ok(user) => {
                info!(user_id = %user.id, "Registered new user");
                Ok(user)
            }
            Err(e) if e.is_unique_violation_on("users") => Err(AuthError::DuplicateLogin(login.to_string())),
            Err(e) => Err(AuthError::Persistence(e)),
        }
    }

    /// Check credentials and issue a token with the configured lifetime.
    ///
    /// Unknown login and wrong password both fail with [`AuthError::InvalidCredentials`].
    #[instrument(skip(self, password), fields(login = %login), err)]
    pub async fn login(&self, login: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let user = self.users.get_by_login(login).await?;

        let hash = match &user {
            Some(user) => user.password_hash.clone(),
            None => self.dummy_hash.clone(),
        };
        let verified = password::verify_password_blocking(password.to_string(), hash).await?;

        match user {
            Some(user) if verified => {
                let token = self.tokens.issue(&CurrentUser::from(&user))?;
                debug!(user_id = %user.id, "Login succeeded");
                Ok(LoginOutcome { token, user })
            }
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    /// Verify a bearer token and return the identity it carries.
    pub fn verify_token(&self, token: &str) -> Result<CurrentUser, AuthError> {
        Ok(self.tokens.verify(token)?)
    }

    fn check_inputs(&self, login: &str, display_name: &str, password: &str) -> Result<(), AuthError> {
        if login.is_empty() || login.chars().count() > MAX_LOGIN_LENGTH {
            return Err(AuthError::Validation(format!(
                "login: must be between 1 and {MAX_LOGIN_LENGTH} characters"
            )));
        }
        if display_name.trim().is_empty() || display_name.chars().count() > MAX_DISPLAY_NAME_LENGTH {
            return Err(AuthError::Validation(format!(
                "name: must be between 1 and {MAX_DISPLAY_NAME_LENGTH} characters"
            )));
        }
        let len = password.chars().count();
        if len < self.policy.min_length || len > self.policy.max_length {
            return Err(AuthError::Validation(format!(
                "password: must be between {} and {} characters",
                self.policy.min_length, self.policy.max_length
            )));
        }
        Ok(())
    }
}
