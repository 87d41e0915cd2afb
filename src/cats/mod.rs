use axum::{routing::get, Router};

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cats", get(handlers::index).post(handlers::create))
        .route("/cats/filter", get(handlers::filter))
        .route("/cats/user/:id", get(handlers::by_user))
        .route(
            "/cats/:id",
            get(handlers::show)
                .post(handlers::update)
                .delete(handlers::destroy),
        )
}
