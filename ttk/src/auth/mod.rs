//! Authentication and authorization.
//!
//! - [`password`]: Argon2id hashing of credentials
//! - [`token`]: signed, time-limited bearer tokens
//! - [`service`]: registration and login rules ([`service::AuthService`])
//! - [`middleware`]: per-request bearer token gate for protected routes
//! - [`current_user`]: extractor giving handlers the authenticated caller
//! - [`ownership`]: creator-only checks for mutations

pub mod current_user;
pub mod errors;
pub mod middleware;
pub mod ownership;
pub mod password;
pub mod service;
pub mod token;
