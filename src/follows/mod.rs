use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::state::AppState;

pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/follows", post(handlers::create))
        .route("/follows/followers/:id", get(handlers::followers))
        .route("/follows/following/:id", get(handlers::following))
        .route("/follows/isfollowing/:id", get(handlers::is_following))
        .route("/follows/isfollowed/:id", get(handlers::is_followed))
        .route("/follows/unfollow/:id", delete(handlers::destroy))
}
