use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::jwt::AuthUser;
use crate::comments::dto::{CommentResource, CreateCommentRequest};
use crate::comments::repo;
use crate::error::ApiError;
use crate::forms::check_max_len;
use crate::policy;
use crate::posts;
use crate::state::AppState;
use crate::users;

/// GET /comments — admin only.
#[instrument(skip(state, actor))]
pub async fn index(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
) -> Result<Json<Value>, ApiError> {
    policy::require_admin(&actor)?;

    let comments = repo::list_all(&state.db).await?;
    let total = comments.len();
    let data = CommentResource::build_many(&state, comments).await?;

    Ok(Json(json!({
        "status": true,
        "data": data,
        "meta": { "total": total },
    })))
}

/// GET /comments/post/:id
#[instrument(skip(state, _actor))]
pub async fn by_post(
    State(state): State<AppState>,
    AuthUser(_actor): AuthUser,
    Path(post_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if posts::repo::find_by_id(&state.db, post_id).await?.is_none() {
        return Err(ApiError::not_found("Post"));
    }

    let comments = repo::list_by_post(&state.db, post_id).await?;
    let total = comments.len();
    let data = CommentResource::build_many(&state, comments).await?;

    Ok(Json(json!({
        "status": true,
        "data": data,
        "meta": { "total": total },
    })))
}

/// GET /comments/user/:id
#[instrument(skip(state, _actor))]
pub async fn by_user(
    State(state): State<AppState>,
    AuthUser(_actor): AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if users::repo::find_by_id(&state.db, user_id).await?.is_none() {
        return Err(ApiError::not_found("Usuario"));
    }

    let comments = repo::list_by_user(&state.db, user_id).await?;
    let total = comments.len();
    let data = CommentResource::build_many(&state, comments).await?;

    Ok(Json(json!({
        "status": true,
        "data": data,
        "meta": { "total": total },
    })))
}

/// GET /comments/:id
#[instrument(skip(state, _actor))]
pub async fn show(
    State(state): State<AppState>,
    AuthUser(_actor): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let comment = repo::find_with_author(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Comentario"))?;
    let data = CommentResource::build(&state, comment).await?;

    Ok(Json(json!({ "status": true, "data": data })))
}

/// POST /comments
#[instrument(skip(state, actor, payload))]
pub async fn create(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    if payload.text.is_empty() {
        return Err(ApiError::Validation("El comentario es obligatorio.".into()));
    }
    check_max_len(
        &payload.text,
        2000,
        "El comentario no puede superar los 2000 caracteres.",
    )?;

    if posts::repo::find_by_id(&state.db, payload.post_id)
        .await?
        .is_none()
    {
        return Err(ApiError::not_found("Post"));
    }

    let comment = repo::insert(&state.db, actor.id, payload.post_id, &payload.text).await?;
    let joined = repo::find_with_author(&state.db, comment.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Comentario"))?;
    let data = CommentResource::build(&state, joined).await?;

    info!(comment_id = %comment.id, post_id = %payload.post_id, user_id = %actor.id, "comment created");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "status": true, "data": data })),
    ))
}

/// DELETE /comments/:id — author or admin.
#[instrument(skip(state, actor))]
pub async fn destroy(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let comment = repo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Comentario"))?;

    policy::require_owner_or_admin(&actor, comment.user_id)?;

    if !repo::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Comentario"));
    }

    info!(comment_id = %id, actor_id = %actor.id, "comment deleted");
    Ok(Json(json!({
        "status": true,
        "message": "Comentario eliminado correctamente",
    })))
}
