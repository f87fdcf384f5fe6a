//! Common type definitions shared across layers.
//!
//! - Type aliases for entity IDs ([`UserId`], [`ArticleId`], ...)
//! - [`Resource`] and [`Operation`] used by ownership checks and error messages
//! - [`abbrev_uuid`] for compact IDs in logs and spans

use std::fmt;
use uuid::Uuid;

// Type aliases for IDs
pub type UserId = Uuid;
pub type ArticleId = Uuid;
pub type TaskId = Uuid;
pub type HistoryId = Uuid;

/// Abbreviate a UUID to its first 8 characters for more readable logs and traces
/// Example: "550e8400-e29b-41d4-a716-446655440000" -> "550e8400"
pub fn abbrev_uuid(uuid: &Uuid) -> String {
    uuid.to_string().chars().take(8).collect()
}

/// Mutations guarded by an ownership or role check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Update,
    Delete,
    ChangeRole,
}

// Resources that can be operated on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Users,
    Articles,
    Tasks,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Update => write!(f, "update"),
            Operation::Delete => write!(f, "delete"),
            Operation::ChangeRole => write!(f, "change the role of"),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Users => write!(f, "user"),
            Resource::Articles => write!(f, "article"),
            Resource::Tasks => write!(f, "task"),
        }
    }
}
