use std::collections::BTreeMap;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::contract::model::{NewUser, User, UserPatch};
use crate::domain::repo::UsersRepository;

#[derive(Debug, Default)]
struct State {
    users: BTreeMap<i64, User>,
    last_id: i64,
}

/// Process-local user store. Every operation takes the lock once and
/// never holds it across an `.await`.
#[derive(Debug, Default)]
pub struct InMemoryUsersRepository {
    state: Mutex<State>,
}

impl InMemoryUsersRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UsersRepository for InMemoryUsersRepository {
    async fn list(&self) -> anyhow::Result<Vec<User>> {
        Ok(self.state.lock().users.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        Ok(self.state.lock().users.get(&id).cloned())
    }

    async fn insert(&self, new_user: NewUser, created_at: DateTime<Utc>) -> anyhow::Result<User> {
        let mut state = self.state.lock();
        let id = state
            .last_id
            .checked_add(1)
            .ok_or_else(|| anyhow!("user id space exhausted"))?;

        let user = User {
            id,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            email: new_user.email,
            created_at,
        };
        state.last_id = id;
        state.users.insert(id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: i64, patch: UserPatch) -> anyhow::Result<Option<User>> {
        let mut state = self.state.lock();
        Ok(state.users.get_mut(&id).map(|user| {
            patch.apply_to(user);
            user.clone()
        }))
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        Ok(self.state.lock().users.remove(&id).is_some())
    }
}
