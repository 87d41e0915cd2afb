use axum::{routing::get, Router};

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/posts", get(handlers::index).post(handlers::create))
        .route("/posts/user/:id", get(handlers::by_user))
        .route(
            "/posts/:id",
            get(handlers::show)
                .put(handlers::update)
                .delete(handlers::destroy),
        )
}
