use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::state::AppState;

pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/likes", post(handlers::create))
        .route("/likes/:post_id", delete(handlers::destroy))
        .route("/likes/isliked/:id", get(handlers::is_liked))
        .route("/likes/count/:id", get(handlers::count))
}
