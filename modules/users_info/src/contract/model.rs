use chrono::{DateTime, Utc};

/// Pure user model for inter-module communication (no serde)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Data for creating a new user
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Partial update data for a user. `None` leaves the field unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.email.is_none()
    }

    /// Merge into `user`; `id` and `created_at` are never touched.
    pub fn apply_to(self, user: &mut User) {
        if let Some(v) = self.first_name {
            user.first_name = v;
        }
        if let Some(v) = self.last_name {
            user.last_name = v;
        }
        if let Some(v) = self.email {
            user.email = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> User {
        User {
            id: 3,
            first_name: "MG".into(),
            last_name: "Kim".into(),
            email: "a@b.com".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn apply_overwrites_only_present_fields() {
        let mut user = sample();
        let before = user.clone();

        UserPatch {
            email: Some("new@x.com".into()),
            ..Default::default()
        }
        .apply_to(&mut user);

        assert_eq!(user.email, "new@x.com");
        assert_eq!(user.first_name, before.first_name);
        assert_eq!(user.last_name, before.last_name);
        assert_eq!(user.id, before.id);
        assert_eq!(user.created_at, before.created_at);
    }

    #[test]
    fn empty_patch_is_noop() {
        let mut user = sample();
        let before = user.clone();
        let patch = UserPatch::default();
        assert!(patch.is_empty());
        patch.apply_to(&mut user);
        assert_eq!(user, before);
    }
}
