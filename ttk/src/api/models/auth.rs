//! API request/response models for registration and login.
//!
//! Registration bodies are validated here, before anything reaches the auth service.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{config::PasswordConfig, errors::Error};

/// Maximum login length
pub const MAX_LOGIN_LENGTH: usize = 50;
/// Minimum login length
pub const MIN_LOGIN_LENGTH: usize = 3;
/// Maximum display name length
pub const MAX_NAME_LENGTH: usize = 100;

/// Special characters accepted (and one of which is required) in passwords
const PASSWORD_SPECIALS: &str = "!@#$%^&*()_+~-";

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// Latin letters only, 3 to 50 characters
    pub login: String,
    /// Display name: letters, spaces and hyphens
    pub name: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

impl RegisterRequest {
    /// Check field formats, returning the first failure as a 400.
    pub fn validate(&self, password: &PasswordConfig) -> Result<(), Error> {
        validate_login(&self.login)
            .and_then(|_| validate_name(&self.name))
            .and_then(|_| validate_password(&self.password, password))
            .map_err(|message| Error::BadRequest { message })
    }
}

/// Login rules, shared with the configured admin login
pub(crate) fn validate_login(login: &str) -> Result<(), String> {
    let len = login.chars().count();
    if !(MIN_LOGIN_LENGTH..=MAX_LOGIN_LENGTH).contains(&len) {
        return Err(format!(
            "login: must be between {MIN_LOGIN_LENGTH} and {MAX_LOGIN_LENGTH} characters"
        ));
    }
    if !login.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err("login: should contain only latin letters".to_string());
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("name: this field is required".to_string());
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(format!("name: maximum length is {MAX_NAME_LENGTH}"));
    }
    if !name.chars().all(|c| c.is_alphabetic() || c.is_whitespace() || c == '-') {
        return Err("name: should contain only letters, spaces and hyphens".to_string());
    }
    Ok(())
}

fn validate_password(password: &str, rules: &PasswordConfig) -> Result<(), String> {
    let len = password.chars().count();
    if len < rules.min_length {
        return Err(format!("password: must be at least {} characters", rules.min_length));
    }
    if len > rules.max_length {
        return Err(format!("password: must be no more than {} characters", rules.max_length));
    }

    let is_special = |c: char| PASSWORD_SPECIALS.contains(c);
    let charset_ok = password.chars().all(|c| c.is_ascii_alphanumeric() || is_special(c));
    let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(is_special);

    if !(charset_ok && has_letter && has_digit && has_special) {
        return Err("password: must include letters, numbers and special symbols".to_string());
    }
    Ok(())
}
