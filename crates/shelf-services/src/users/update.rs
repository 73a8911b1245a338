//! Update Service for Users
//!
//! Schema, then contract, then the store.

use shelf_contracts::base::Contract;
use shelf_contracts::users::{UpdateUserContract, UpdateUserForm};
use shelf_core::{ShelfError, ShelfResult};
use shelf_core::traits::UserContext;
use shelf_db::{RepositoryError, UpdateUserDto, UserStore};
use shelf_models::User;
use tracing::info;

pub struct UpdateUserService<'a, U: UserContext> {
    user: &'a U,
    users: &'a dyn UserStore,
}

impl<'a, U: UserContext> UpdateUserService<'a, U> {
    pub fn new(user: &'a U, users: &'a dyn UserStore) -> Self {
        Self { user, users }
    }

    /// Execute the update operation
    pub async fn call(self, form: UpdateUserForm) -> ShelfResult<User> {
        let payload = form.parse()?;

        UpdateUserContract::new(self.user)
            .validate(&payload)
            .map_err(|errors| ShelfError::forbidden(errors.full_messages().join(", ")))?;

        let dto = UpdateUserDto {
            email: Some(payload.email),
            username: Some(payload.username),
            first_name: payload.first_name,
            last_name: payload.last_name,
            profile_picture: None,
        };

        let user = self
            .users
            .update(&payload.id, dto)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound(id) => ShelfError::not_found("User", id),
                other => other.into(),
            })?;

        info!(user_id = %user.id, "User settings updated");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{owner, user};
    use shelf_db::MemoryStore;

    fn form(id: &str) -> UpdateUserForm {
        UpdateUserForm {
            id: id.into(),
            email: "Jane.Doe@Example.com".into(),
            username: "janedoe".into(),
            first_name: Some("Jane".into()),
            last_name: None,
        }
    }

    async fn store() -> MemoryStore {
        let store = MemoryStore::new();
        store.insert_user(user("u_1", "jane@example.com", "jane")).await;
        store.insert_user(user("u_2", "john@example.com", "johndoe")).await;
        store
    }

    #[tokio::test]
    async fn test_update_user() {
        let store = store().await;
        let session = owner("u_1");

        let updated = UpdateUserService::new(&session, &store)
            .call(form("u_1"))
            .await
            .unwrap();

        assert_eq!(updated.email, "jane.doe@example.com");
        assert_eq!(updated.username, "janedoe");
        assert_eq!(updated.first_name.as_deref(), Some("Jane"));
    }

    #[tokio::test]
    async fn test_blank_name_clears_it() {
        let store = store().await;
        let session = owner("u_1");

        UpdateUserService::new(&session, &store)
            .call(form("u_1"))
            .await
            .unwrap();
        let updated = UpdateUserService::new(&session, &store)
            .call(UpdateUserForm {
                first_name: Some("  ".into()),
                ..form("u_1")
            })
            .await
            .unwrap();

        assert_eq!(updated.first_name, None);
    }

    #[tokio::test]
    async fn test_invalid_email_is_field_error() {
        let store = store().await;
        let session = owner("u_1");

        let err = UpdateUserService::new(&session, &store)
            .call(UpdateUserForm {
                email: "nope".into(),
                ..form("u_1")
            })
            .await
            .unwrap_err();

        match err {
            ShelfError::Validation(errors) => assert!(errors.has_error("email")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_taken_username() {
        let store = store().await;
        let session = owner("u_1");

        let err = UpdateUserService::new(&session, &store)
            .call(UpdateUserForm {
                username: "johndoe".into(),
                ..form("u_1")
            })
            .await
            .unwrap_err();

        match err {
            ShelfError::Validation(errors) => assert_eq!(
                errors.get("username").unwrap(),
                &vec!["username is already taken.".to_string()]
            ),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_cannot_update_someone_else() {
        let store = store().await;
        let session = owner("u_1");

        let err = UpdateUserService::new(&session, &store)
            .call(form("u_2"))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 403);
        let untouched = store.find_by_id("u_2").await.unwrap().unwrap();
        assert_eq!(untouched.email, "john@example.com");
    }
}
