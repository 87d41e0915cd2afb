use axum::{routing::get, Router};

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/comments", get(handlers::index).post(handlers::create))
        .route("/comments/post/:id", get(handlers::by_post))
        .route("/comments/user/:id", get(handlers::by_user))
        .route(
            "/comments/:id",
            get(handlers::show).delete(handlers::destroy),
        )
}
