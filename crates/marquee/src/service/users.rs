//! User registration stand-in.
//!
//! Only the password hash reaches this layer; hashing happens upstream.

use std::sync::Arc;

use uuid::Uuid;

use marquee_core::catalog::{CreateUserRequest, User};
use marquee_core::storage::UserRepository;

use crate::error::{Result, ServiceError};

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Registers a user. Username and email must both be unused.
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User> {
        let user = User::new(request.username, request.email, request.password_hash);
        self.users.create_user(&user).await?;
        tracing::debug!(user_id = %user.id, username = %user.username, "Created user");
        Ok(user)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User> {
        self.users
            .get_user(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<User> {
        self.users
            .get_user_by_username(username)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", username))
    }

    /// Deletes a user with their ratings and watchlist.
    pub async fn delete_user(&self, id: Uuid) -> Result<()> {
        self.users.delete_user(id).await?;
        tracing::debug!(user_id = %id, "Deleted user");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryRepository;

    fn request(username: &str, email: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let service = UserService::new(Arc::new(InMemoryRepository::new()));

        let user = service
            .create_user(request("alice", "alice@example.com"))
            .await
            .unwrap();

        assert_eq!(service.get_user(user.id).await.unwrap().username, "alice");
        assert_eq!(service.get_user_by_username("alice").await.unwrap().id, user.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let service = UserService::new(Arc::new(InMemoryRepository::new()));
        service
            .create_user(request("alice", "alice@example.com"))
            .await
            .unwrap();

        let result = service
            .create_user(request("alicia", "alice@example.com"))
            .await;

        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_delete_user() {
        let service = UserService::new(Arc::new(InMemoryRepository::new()));
        let user = service
            .create_user(request("alice", "alice@example.com"))
            .await
            .unwrap();

        service.delete_user(user.id).await.unwrap();

        assert_eq!(
            service.get_user(user.id).await,
            Err(ServiceError::not_found("User", user.id))
        );
        assert!(matches!(
            service.delete_user(user.id).await,
            Err(ServiceError::NotFound { .. })
        ));
    }
}
