use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/catposts",
            post(handlers::create).delete(handlers::destroy),
        )
        .route("/posts/:id/cats", get(handlers::post_cats))
        .route("/cats/:id/posts", get(handlers::cat_posts))
}
