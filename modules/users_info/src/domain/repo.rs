use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::contract::model::{NewUser, User, UserPatch};

/// Storage port for users. Implementations own id assignment.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// All users, ascending by id.
    async fn list(&self) -> anyhow::Result<Vec<User>>;

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>>;

    /// Assigns the next id and stores the user in one step.
    async fn insert(&self, new_user: NewUser, created_at: DateTime<Utc>) -> anyhow::Result<User>;

    /// Merges `patch` into the stored user; `None` if the id is unknown.
    async fn update(&self, id: i64, patch: UserPatch) -> anyhow::Result<Option<User>>;

    /// Returns whether a user was removed.
    async fn delete(&self, id: i64) -> anyhow::Result<bool>;
}
