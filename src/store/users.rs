use parking_lot::RwLock;
use serde::Serialize;
use time::OffsetDateTime;

use super::table::{Record, Table};
use super::StoreError;

/// User account. The password is only ever kept as an Argon2 hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 PHC string, never sent to clients
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Record for User {
    fn id(&self) -> u64 {
        self.id
    }
    fn touch(&mut self, now: OffsetDateTime) {
        self.updated_at = now;
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
}

impl NewUser {
    pub(super) fn build(self, id: u64, now: OffsetDateTime) -> User {
        User {
            id,
            email: self.email,
            username: self.username,
            password_hash: self.password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub username: Option<String>,
    pub password_hash: Option<String>,
}

#[derive(Debug, Default)]
pub struct UserStore {
    pub(super) inner: RwLock<Table<User>>,
}

impl UserStore {
    /// Insert a user; emails are compared exactly as stored.
    pub fn create(&self, new: NewUser) -> Result<User, StoreError> {
        let mut table = self.inner.write();
        insert_unique(&mut table, new)
    }

    pub fn find_by_id(&self, id: u64) -> Option<User> {
        self.inner.read().get(id).cloned()
    }

    pub fn find_by_email(&self, email: &str) -> Option<User> {
        self.inner.read().find(|u| u.email == email).cloned()
    }

    pub fn update_by_id(&self, id: u64, patch: UserPatch) -> Option<User> {
        self.inner.write().update(id, |u| {
            if let Some(username) = patch.username {
                u.username = username;
            }
            if let Some(hash) = patch.password_hash {
                u.password_hash = hash;
            }
        })
    }

    pub fn delete_by_id(&self, id: u64) -> bool {
        self.inner.write().remove(id)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn reset(&self) {
        self.inner.write().clear();
    }
}

pub(super) fn insert_unique(table: &mut Table<User>, new: NewUser) -> Result<User, StoreError> {
    if table.find(|u| u.email == new.email).is_some() {
        return Err(StoreError::EmailTaken);
    }
    Ok(table.insert_with(|id, now| new.build(id, now)))
}
