use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::jwt::AuthUser;
use crate::cats;
use crate::cats::dto::CatResource;
use crate::catposts::repo;
use crate::error::ApiError;
use crate::posts;
use crate::posts::dto::PostResource;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CatPostRequest {
    pub cat_id: Uuid,
    pub post_id: Uuid,
}

/// Both sides of the relation must exist before touching the tag table.
async fn check_pair(state: &AppState, cat_id: Uuid, post_id: Uuid) -> Result<(), ApiError> {
    if cats::repo::find_by_id(&state.db, cat_id).await?.is_none() {
        return Err(ApiError::NotFound(
            "El gato no existe en la base de datos".into(),
        ));
    }
    if posts::repo::find_by_id(&state.db, post_id).await?.is_none() {
        return Err(ApiError::NotFound(
            "El post no existe en la base de datos".into(),
        ));
    }
    Ok(())
}

/// GET /posts/:id/cats
#[instrument(skip(state, _actor))]
pub async fn post_cats(
    State(state): State<AppState>,
    AuthUser(_actor): AuthUser,
    Path(post_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if posts::repo::find_by_id(&state.db, post_id).await?.is_none() {
        return Err(ApiError::not_found("Post"));
    }

    let cats = repo::cats_of_post(&state.db, post_id).await?;
    let data = CatResource::build_many(&state, cats).await?;

    Ok(Json(json!({ "status": true, "data": data })))
}

/// GET /cats/:id/posts
#[instrument(skip(state, _actor))]
pub async fn cat_posts(
    State(state): State<AppState>,
    AuthUser(_actor): AuthUser,
    Path(cat_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if cats::repo::find_by_id(&state.db, cat_id).await?.is_none() {
        return Err(ApiError::not_found("Gato"));
    }

    let posts = repo::posts_of_cat(&state.db, cat_id).await?;
    let data = PostResource::build_many(&state, posts).await?;

    Ok(Json(json!({ "status": true, "data": data })))
}

/// POST /catposts
#[instrument(skip(state, actor, payload))]
pub async fn create(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Json(payload): Json<CatPostRequest>,
) -> Result<Json<Value>, ApiError> {
    check_pair(&state, payload.cat_id, payload.post_id).await?;

    if !repo::insert(&state.db, payload.cat_id, payload.post_id).await? {
        return Err(ApiError::Conflict(
            "Ya esta registrado que el gato aparece en ese post".into(),
        ));
    }

    info!(cat_id = %payload.cat_id, post_id = %payload.post_id, actor_id = %actor.id, "cat tagged in post");
    Ok(Json(json!({
        "status": true,
        "message": "El gato y el post han sido relacionados.",
    })))
}

/// DELETE /catposts
#[instrument(skip(state, actor, payload))]
pub async fn destroy(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Json(payload): Json<CatPostRequest>,
) -> Result<Json<Value>, ApiError> {
    check_pair(&state, payload.cat_id, payload.post_id).await?;

    if !repo::delete(&state.db, payload.cat_id, payload.post_id).await? {
        return Err(ApiError::NotFound(
            "Esa relacion no esta registrada en la base de datos".into(),
        ));
    }

    info!(cat_id = %payload.cat_id, post_id = %payload.post_id, actor_id = %actor.id, "cat tag removed");
    Ok(Json(json!({
        "status": true,
        "message": "La relación ha sido eliminada.",
    })))
}
