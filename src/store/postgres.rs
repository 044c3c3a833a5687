use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::{PasswordResetToken, User};
use crate::store::{NewUser, Store, StoreError, UserChanges};

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_unique_violation() {
            let field = match db_err.constraint() {
                Some("users_email_key") => "email",
                Some("users_username_key") => "username",
                _ => "unique",
            };
            return StoreError::Conflict { field };
        }
    }
    StoreError::Backend(err.to_string())
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (email, username, password_hash, avatar)
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(&new.email)
        .bind(&new.username)
        .bind(&new.password_hash)
        .bind(&new.avatar)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            "UPDATE users
             SET email = $2, password_hash = $3, avatar = COALESCE($4, avatar), updated_at = now()
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&changes.email)
        .bind(&changes.password_hash)
        .bind(&changes.avatar)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?
        .ok_or(StoreError::NotFound)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)
    }

    async fn find_user_by_token(
        &self,
        token: &str,
    ) -> Result<Option<(User, PasswordResetToken)>, StoreError> {
        let row = sqlx::query_as::<_, PasswordResetToken>(
            "SELECT * FROM password_reset_tokens WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        let Some(reset_token) = row else {
            return Ok(None);
        };

        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(reset_token.user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(Some((user, reset_token)))
    }

    async fn upsert_reset_token(
        &self,
        user_id: i64,
        token: &str,
    ) -> Result<PasswordResetToken, StoreError> {
        sqlx::query_as::<_, PasswordResetToken>(
            "INSERT INTO password_reset_tokens (user_id, token)
             VALUES ($1, $2)
             ON CONFLICT (user_id)
             DO UPDATE SET token = EXCLUDED.token, created_at = now()
             RETURNING *",
        )
        .bind(user_id)
        .bind(token)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)
    }

    async fn consume_reset_tokens(
        &self,
        user_id: i64,
        password_hash: &str,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        sqlx::query("UPDATE users SET password_hash = $2, updated_at = now() WHERE id = $1")
            .bind(user_id)
            .bind(password_hash)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        sqlx::query("DELETE FROM password_reset_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        tx.commit().await.map_err(db_error)
    }
}
