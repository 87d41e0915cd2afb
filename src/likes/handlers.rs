use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::jwt::AuthUser;
use crate::error::ApiError;
use crate::likes::repo;
use crate::posts;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LikeRequest {
    pub post_id: Uuid,
}

/// POST /likes
#[instrument(skip(state, actor, payload))]
pub async fn create(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Json(payload): Json<LikeRequest>,
) -> Result<Json<Value>, ApiError> {
    if posts::repo::find_by_id(&state.db, payload.post_id)
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound(
            "El post al que quiere dar like no existe.".into(),
        ));
    }

    if !repo::insert(&state.db, actor.id, payload.post_id).await? {
        return Err(ApiError::Conflict("Ya has dado like a este post.".into()));
    }

    info!(user_id = %actor.id, post_id = %payload.post_id, "like registered");
    Ok(Json(json!({
        "status": true,
        "message": "Like registrado exitosamente.",
    })))
}

/// DELETE /likes/:post_id — the row is located by (actor, post).
#[instrument(skip(state, actor))]
pub async fn destroy(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(post_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if !repo::delete(&state.db, actor.id, post_id).await? {
        return Err(ApiError::NotFound("No has dado like a este post.".into()));
    }

    info!(user_id = %actor.id, post_id = %post_id, "like removed");
    Ok(Json(json!({
        "status": true,
        "message": "Like eliminado exitosamente.",
    })))
}

/// GET /likes/isliked/:id
#[instrument(skip(state, actor))]
pub async fn is_liked(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(post_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if posts::repo::find_by_id(&state.db, post_id).await?.is_none() {
        return Err(ApiError::not_found("Post"));
    }

    let is_liked = repo::is_liked(&state.db, actor.id, post_id).await?;
    Ok(Json(json!({ "status": true, "isLiked": is_liked })))
}

/// GET /likes/count/:id
#[instrument(skip(state, _actor))]
pub async fn count(
    State(state): State<AppState>,
    AuthUser(_actor): AuthUser,
    Path(post_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if posts::repo::find_by_id(&state.db, post_id).await?.is_none() {
        return Err(ApiError::not_found("Post"));
    }

    let likes = repo::count_for_post(&state.db, post_id).await?;
    Ok(Json(json!({ "status": true, "likes": likes })))
}
