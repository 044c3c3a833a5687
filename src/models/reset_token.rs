use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A password reset credential. Keyed by user id: each user holds at most
/// one live token, and issuing a new one replaces it.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct PasswordResetToken {
    pub user_id: i64,
    pub token: String,
    pub created_at: DateTime<Utc>,
}
