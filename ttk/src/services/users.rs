//! User lookups and role management.

use std::sync::Arc;
use tracing::{info, instrument};

use crate::{
    api::models::users::{CurrentUser, Role},
    db::{
        errors::DbError,
        handlers::UserRepository,
        models::users::{UserDBResponse, UserUpdateDBRequest},
    },
    errors::{Error, Result},
    types::{Operation, Resource, UserId, abbrev_uuid},
};

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

fn not_found(id: UserId) -> Error {
    Error::NotFound {
        resource: "User".to_string(),
        id: id.to_string(),
    }
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn get(&self, id: UserId) -> Result<UserDBResponse> {
        self.users.get_by_id(id).await?.ok_or_else(|| not_found(id))
    }

    /// Change a user's role. The caller's role is read from storage rather than the token, so a
    /// demotion takes effect immediately.
    #[instrument(skip(self, caller), fields(caller_id = %abbrev_uuid(&caller.id), user_id = %abbrev_uuid(&id)), err)]
    pub async fn set_role(&self, caller: &CurrentUser, id: UserId, role: Role) -> Result<UserDBResponse> {
        let is_admin = self
            .users
            .get_by_id(caller.id)
            .await?
            .is_some_and(|u| u.role == Role::Admin);
        if !is_admin {
            return Err(Error::Forbidden {
                action: Operation::ChangeRole,
                resource: Resource::Users,
            });
        }

        let update = UserUpdateDBRequest {
            role: Some(role),
            ..Default::default()
        };
        let user = self.users.update(id, &update).await.map_err(|e| match e {
            DbError::NotFound => not_found(id),
            other => other.into(),
        })?;

        info!(?role, "Changed user role");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{InMemoryStore, insert_user, promote};
    use uuid::Uuid;

    #[tokio::test]
    async fn test_get_missing_user() {
        let store = InMemoryStore::default();
        let users = UserService::new(store.users());

        let err = users.get(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_only_admin_changes_roles() {
        let store = InMemoryStore::default();
        let users = UserService::new(store.users());
        let admin = insert_user(&store, "root").await;
        let alice = insert_user(&store, "alice").await;
        promote(&store, admin.id).await;

        let err = users.set_role(&alice, alice.id, Role::Admin).await.unwrap_err();
        assert!(matches!(err, Error::Forbidden { action: Operation::ChangeRole, .. }));
        assert_eq!(users.get(alice.id).await.unwrap().role, Role::User);

        let updated = users.set_role(&admin, alice.id, Role::Admin).await.unwrap();
        assert_eq!(updated.role, Role::Admin);
        assert_eq!(updated.login, "alice");
    }

    #[tokio::test]
    async fn test_demoted_admin_loses_rights() {
        let store = InMemoryStore::default();
        let users = UserService::new(store.users());
        let admin = insert_user(&store, "root").await;
        promote(&store, admin.id).await;

        users.set_role(&admin, admin.id, Role::User).await.unwrap();

        let err = users.set_role(&admin, admin.id, Role::Admin).await.unwrap_err();
        assert!(matches!(err, Error::Forbidden { .. }));
    }

    #[tokio::test]
    async fn test_set_role_of_missing_user() {
        let store = InMemoryStore::default();
        let users = UserService::new(store.users());
        let admin = insert_user(&store, "root").await;
        promote(&store, admin.id).await;

        let err = users.set_role(&admin, Uuid::new_v4(), Role::Admin).await.unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }
}
