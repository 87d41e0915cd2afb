use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(handlers::index))
        .route("/users/filter", get(handlers::filter))
        .route("/users/:id", get(handlers::show).delete(handlers::destroy))
        .route("/users/:id/profile", post(handlers::update_profile))
        .route("/users/:id/credentials", post(handlers::update_credentials))
}
