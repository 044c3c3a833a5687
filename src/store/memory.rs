use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::models::{PasswordResetToken, User};
use crate::store::{NewUser, Store, StoreError, UserChanges};

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    tokens: Vec<PasswordResetToken>,
    next_id: i64,
}

/// In-memory `Store` used by the integration test suite in place of a
/// throwaway Postgres database.
#[derive(Default)]
pub struct MemStore {
    inner: Mutex<Inner>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shift a user's token creation time into the past, so tests can age
    /// a token beyond its freshness window.
    pub fn backdate_token(&self, user_id: i64, age: Duration) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(t) = inner.tokens.iter_mut().find(|t| t.user_id == user_id) {
            t.created_at = Utc::now() - age;
        }
    }

    pub fn token_for_user(&self, user_id: i64) -> Option<PasswordResetToken> {
        let inner = self.inner.lock().unwrap();
        inner.tokens.iter().find(|t| t.user_id == user_id).cloned()
    }

    pub fn token_count(&self) -> usize {
        self.inner.lock().unwrap().tokens.len()
    }

    pub fn user_count(&self) -> usize {
        self.inner.lock().unwrap().users.len()
    }
}

#[async_trait]
impl Store for MemStore {
    async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        let mut inner = self.inner.lock().unwrap();

        if inner.users.iter().any(|u| u.email == new.email) {
            return Err(StoreError::Conflict { field: "email" });
        }
        if inner.users.iter().any(|u| u.username == new.username) {
            return Err(StoreError::Conflict { field: "username" });
        }

        inner.next_id += 1;
        let now = Utc::now();
        let user = User {
            id: inner.next_id,
            email: new.email,
            username: new.username,
            password_hash: new.password_hash,
            avatar: new.avatar,
            created_at: now,
            updated_at: now,
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> Result<User, StoreError> {
        let mut inner = self.inner.lock().unwrap();

        if inner
            .users
            .iter()
            .any(|u| u.id != id && u.email == changes.email)
        {
            return Err(StoreError::Conflict { field: "email" });
        }

        let user = inner
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(StoreError::NotFound)?;

        user.email = changes.email;
        user.password_hash = changes.password_hash;
        if let Some(avatar) = changes.avatar {
            user.avatar = Some(avatar);
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_token(
        &self,
        token: &str,
    ) -> Result<Option<(User, PasswordResetToken)>, StoreError> {
        let inner = self.inner.lock().unwrap();

        let Some(reset_token) = inner.tokens.iter().find(|t| t.token == token).cloned() else {
            return Ok(None);
        };
        let user = inner
            .users
            .iter()
            .find(|u| u.id == reset_token.user_id)
            .cloned()
            .ok_or(StoreError::Backend("token owner missing".to_string()))?;

        Ok(Some((user, reset_token)))
    }

    async fn upsert_reset_token(
        &self,
        user_id: i64,
        token: &str,
    ) -> Result<PasswordResetToken, StoreError> {
        let mut inner = self.inner.lock().unwrap();

        inner.tokens.retain(|t| t.user_id != user_id);
        let reset_token = PasswordResetToken {
            user_id,
            token: token.to_string(),
            created_at: Utc::now(),
        };
        inner.tokens.push(reset_token.clone());
        Ok(reset_token)
    }

    async fn consume_reset_tokens(
        &self,
        user_id: i64,
        password_hash: &str,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();

        let user = inner
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(StoreError::NotFound)?;
        user.password_hash = password_hash.to_string();
        user.updated_at = Utc::now();

        inner.tokens.retain(|t| t.user_id != user_id);
        Ok(())
    }
}
