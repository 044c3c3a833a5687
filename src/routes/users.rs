use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Serialize;

use crate::auth::password;
use crate::error::AppError;
use crate::models::User;
use crate::state::SharedState;
use crate::store::{NewUser, StoreError, UserChanges};
use crate::validation::{self, CreateUserRequest, UpdateUserRequest};

#[derive(Serialize)]
pub struct UserResponse {
    pub user: User,
}

pub async fn create(
    State(state): State<SharedState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let input = validation::validate_create_user(req).map_err(AppError::Validation)?;

    let password_hash = password::hash(&input.password).map_err(AppError::Internal)?;

    let user = state
        .store
        .create_user(NewUser {
            email: input.email,
            username: input.username,
            password_hash,
            avatar: input.avatar,
        })
        .await?;

    tracing::info!(user_id = user.id, "user created");

    Ok((StatusCode::CREATED, Json(UserResponse { user })))
}

pub async fn update(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let input = validation::validate_update_user(req).map_err(AppError::Validation)?;

    let password_hash = password::hash(&input.password).map_err(AppError::Internal)?;

    let user = state
        .store
        .update_user(
            id,
            UserChanges {
                email: input.email,
                password_hash,
                avatar: input.avatar,
            },
        )
        .await
        .map_err(|e| match e {
            StoreError::NotFound => AppError::NotFound("User not found".to_string()),
            other => other.into(),
        })?;

    Ok(Json(UserResponse { user }))
}
