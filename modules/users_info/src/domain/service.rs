use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument};

use crate::contract::model::{NewUser, User, UserPatch};
use crate::domain::error::DomainError;
use crate::domain::repo::UsersRepository;

/// Domain service with business rules for user management.
/// Depends only on the repository port, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn UsersRepository>,
}

impl Service {
    pub fn new(repo: Arc<dyn UsersRepository>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        let users = self.repo.list().await?;
        if users.is_empty() {
            debug!("user store is empty");
            return Err(DomainError::no_users());
        }
        debug!(count = users.len(), "listed users");
        Ok(users)
    }

    #[instrument(skip(self), fields(user_id = id))]
    pub async fn get_user(&self, id: i64) -> Result<User, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))
    }

    #[instrument(skip(self, new_user), fields(email = %new_user.email))]
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, DomainError> {
        let user = self.repo.insert(new_user, Utc::now()).await?;
        info!(user_id = user.id, "created user");
        Ok(user)
    }

    #[instrument(skip(self, patch), fields(user_id = id))]
    pub async fn update_user(&self, id: i64, patch: UserPatch) -> Result<User, DomainError> {
        if patch.is_empty() {
            debug!("empty patch; fields stay unchanged");
        }
        let user = self
            .repo
            .update(id, patch)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))?;
        info!("updated user");
        Ok(user)
    }

    #[instrument(skip(self), fields(user_id = id))]
    pub async fn delete_user(&self, id: i64) -> Result<(), DomainError> {
        if !self.repo.delete(id).await? {
            return Err(DomainError::user_not_found(id));
        }
        info!("deleted user");
        Ok(())
    }
}
