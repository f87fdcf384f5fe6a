//! HTTP API layer.
//!
//! - [`handlers`]: axum route handlers, one module per resource
//! - [`models`]: request and response types, with boundary validation

pub mod handlers;
pub mod models;
