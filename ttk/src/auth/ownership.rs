//! Creator-only checks for mutations.
//!
//! Articles and tasks record the user who created them. Updates and deletes must be made by
//! that user; the check runs before any write, so a rejected call leaves the record untouched.

use crate::{
    api::models::users::CurrentUser,
    errors::{Error, Result},
    types::{Operation, Resource, UserId, abbrev_uuid},
};

pub fn ensure_owner(owner: UserId, user: &CurrentUser, action: Operation, resource: Resource) -> Result<()> {
    if owner == user.id {
        return Ok(());
    }

    tracing::info!(
        user_id = %abbrev_uuid(&user.id),
        owner_id = %abbrev_uuid(&owner),
        "Rejected {action} on {resource} by non-owner"
    );
    Err(Error::Forbidden { action, resource })
}
