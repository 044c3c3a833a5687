pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::models::{PasswordResetToken, User};

/// Input for `Store::create_user`. The password arrives already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub avatar: Option<String>,
}

/// Changes applied by `Store::update_user`. A `None` avatar leaves the
/// stored value untouched.
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub email: String,
    pub password_hash: String,
    pub avatar: Option<String>,
}

#[derive(Debug)]
pub enum StoreError {
    /// A unique constraint was violated; carries the offending column.
    Conflict { field: &'static str },
    NotFound,
    Backend(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Conflict { field } => write!(f, "unique violation on {field}"),
            StoreError::NotFound => write!(f, "record not found"),
            StoreError::Backend(msg) => write!(f, "store backend error: {msg}"),
        }
    }
}

/// Persistence contract for user credentials and reset tokens.
///
/// The server runs against `postgres::PgStore`; the test suite swaps in
/// `memory::MemStore`.
#[async_trait]
pub trait Store: Send + Sync {
    async fn create_user(&self, new: NewUser) -> Result<User, StoreError>;

    /// Apply profile/password changes to an existing user. Unknown id
    /// fails with `StoreError::NotFound`.
    async fn update_user(&self, id: i64, changes: UserChanges) -> Result<User, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Look up the user owning a reset token equal to `token`, together
    /// with the token row. Expiry is the caller's concern.
    async fn find_user_by_token(
        &self,
        token: &str,
    ) -> Result<Option<(User, PasswordResetToken)>, StoreError>;

    /// Create-or-replace the reset token for a user. At most one token row
    /// exists per user id; re-issuing overwrites the value and timestamp.
    async fn upsert_reset_token(
        &self,
        user_id: i64,
        token: &str,
    ) -> Result<PasswordResetToken, StoreError>;

    /// Store the new password hash and delete every reset token owned by
    /// the user as one all-or-nothing operation. A crash must not leave a
    /// changed password with a live token, or the reverse.
    async fn consume_reset_tokens(
        &self,
        user_id: i64,
        password_hash: &str,
    ) -> Result<(), StoreError>;
}
