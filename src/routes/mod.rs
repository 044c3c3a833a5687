pub mod passwords;
pub mod sessions;
pub mod users;

use axum::Router;
use axum::routing::{post, put};

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Users
        .route("/users", post(users::create))
        .route("/users/{id}", put(users::update))
        // Sessions
        .route(
            "/sessions",
            post(sessions::create).delete(sessions::delete),
        )
        // Password recovery
        .route("/forgot-password", post(passwords::forgot_password))
        .route("/reset-password", post(passwords::reset_password))
}
