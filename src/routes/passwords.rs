use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, Utc};

use crate::auth::password;
use crate::email::{templates, Mail};
use crate::error::AppError;
use crate::state::SharedState;
use crate::validation::{self, ForgotPasswordRequest, ResetPasswordRequest};

/// How long an issued token stays valid.
const TOKEN_TTL_HOURS: i64 = 2;

const RESET_MAIL_SUBJECT: &str = "Roleplay: Recuperação de senha";

fn generate_reset_token() -> String {
    let bytes: [u8; 24] = rand::random();
    hex::encode(bytes)
}

pub async fn forgot_password(
    State(state): State<SharedState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<StatusCode, AppError> {
    let input = validation::validate_forgot_password(req).map_err(AppError::Validation)?;

    let user = state
        .store
        .find_user_by_email(&input.email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let token = generate_reset_token();
    state.store.upsert_reset_token(user.id, &token).await?;

    let reset_url = format!("{}?token={}", input.reset_password_url, token);
    let mail = Mail {
        from: state.config.mail_from.clone(),
        to: user.email.clone(),
        subject: RESET_MAIL_SUBJECT.to_string(),
        html: templates::render_password_reset(&user.username, &reset_url),
    };

    // Delivery failure fails the request; it is never dropped silently.
    state.mailer.send(mail).await.map_err(AppError::Internal)?;

    tracing::info!(user_id = user.id, "password reset token issued");

    Ok(StatusCode::NO_CONTENT)
}

pub async fn reset_password(
    State(state): State<SharedState>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<StatusCode, AppError> {
    let input = validation::validate_reset_password(req).map_err(AppError::Validation)?;

    let (user, reset_token) = state
        .store
        .find_user_by_token(&input.token)
        .await?
        .ok_or_else(|| AppError::NotFound("Invalid reset token".to_string()))?;

    if Utc::now() - reset_token.created_at > Duration::hours(TOKEN_TTL_HOURS) {
        return Err(AppError::TokenExpired);
    }

    let password_hash = password::hash(&input.password).map_err(AppError::Internal)?;
    state
        .store
        .consume_reset_tokens(user.id, &password_hash)
        .await?;

    tracing::info!(user_id = user.id, "password reset completed");

    Ok(StatusCode::NO_CONTENT)
}
