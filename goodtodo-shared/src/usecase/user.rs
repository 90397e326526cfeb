//! Profile use cases for the authenticated user

use std::sync::Arc;

use super::error::{UseCaseError, UseCaseResult};
use crate::auth::Principal;
use crate::models::User;
use crate::repository::UserRepository;

#[derive(Debug, Clone)]
pub struct UpdateMeInput {
    pub name: String,
}

pub struct UserInteractor {
    users: Arc<dyn UserRepository>,
}

impl UserInteractor {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn get_me(&self, principal: &Principal) -> UseCaseResult<User> {
        self.users
            .find_by_id(principal.tenant_id, principal.user_id)
            .await?
            .ok_or(UseCaseError::UserNotFound)
    }

    /// Changes the display name; nothing else about the user is writable here
    pub async fn update_me(&self, principal: &Principal, input: UpdateMeInput) -> UseCaseResult<User> {
        let mut user = self.get_me(principal).await?;
        user.name = input.name;

        let updated = self
            .users
            .update(&user)
            .await?
            .ok_or(UseCaseError::UserNotFound)?;

        tracing::info!(user_id = %updated.id, "Profile updated");
        Ok(updated)
    }
}
