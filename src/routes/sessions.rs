use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::auth::extractor::AuthUser;
use crate::auth::jwt::{encode_token, Claims};
use crate::auth::password;
use crate::error::AppError;
use crate::models::User;
use crate::state::SharedState;
use crate::validation::{self, LoginRequest};

#[derive(Serialize)]
pub struct SessionResponse {
    pub user: User,
    pub token: String,
}

pub async fn create(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let input = validation::validate_login(req).map_err(AppError::Validation)?;

    if state.login_limiter.check(&input.email).is_err() {
        return Err(AppError::RateLimited(
            "Too many login attempts. Please try again later.".to_string(),
        ));
    }

    let user = state
        .store
        .find_user_by_email(&input.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    let valid = password::verify(&input.password, &user.password_hash).map_err(AppError::Internal)?;
    if !valid {
        state.login_limiter.record_failure(&input.email);
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = encode_token(&Claims::new(user.id), &state.config.jwt_secret)
        .map_err(AppError::Internal)?;

    Ok((StatusCode::CREATED, Json(SessionResponse { user, token })))
}

/// Sessions are stateless bearer tokens; logout is the client discarding
/// its token. The handler still demands a valid one.
pub async fn delete(_auth: AuthUser) -> StatusCode {
    StatusCode::NO_CONTENT
}
