//! Database record structures matching table schemas.

pub mod articles;
pub mod history;
pub mod tasks;
pub mod users;
