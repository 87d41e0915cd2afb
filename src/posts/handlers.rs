use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::jwt::AuthUser;
use crate::error::ApiError;
use crate::forms::{self, check_max_len};
use crate::images;
use crate::policy;
use crate::posts::dto::{PostResource, UpdatePostRequest};
use crate::posts::repo;
use crate::state::AppState;
use crate::users;

/// GET /posts — newest first.
#[instrument(skip(state, _actor))]
pub async fn index(
    State(state): State<AppState>,
    AuthUser(_actor): AuthUser,
) -> Result<Json<Value>, ApiError> {
    let posts = repo::list_all(&state.db).await?;
    let total = repo::count(&state.db).await?;
    let data = PostResource::build_many(&state, posts).await?;

    Ok(Json(json!({
        "status": true,
        "data": data,
        "meta": { "total": total },
    })))
}

/// GET /posts/user/:id
#[instrument(skip(state, _actor))]
pub async fn by_user(
    State(state): State<AppState>,
    AuthUser(_actor): AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if users::repo::find_by_id(&state.db, user_id).await?.is_none() {
        return Err(ApiError::not_found("Usuario"));
    }

    let posts = repo::list_by_user(&state.db, user_id).await?;
    let total = posts.len();
    let data = PostResource::build_many(&state, posts).await?;

    Ok(Json(json!({
        "status": true,
        "data": data,
        "meta": { "total": total },
    })))
}

/// GET /posts/:id
#[instrument(skip(state, _actor))]
pub async fn show(
    State(state): State<AppState>,
    AuthUser(_actor): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let post = repo::find_with_author(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post"))?;
    let data = PostResource::build(&state, post).await?;

    Ok(Json(json!({ "status": true, "data": data })))
}

/// POST /posts — multipart with a required image and description.
#[instrument(skip(state, actor, mp))]
pub async fn create(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    mp: Multipart,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let form = forms::read_form(mp, "image").await?;

    let description = form
        .required_text("description", "La descripción es obligatoria.")?
        .to_string();
    check_max_len(
        &description,
        2000,
        "La descripción no puede superar los 2000 caracteres.",
    )?;

    let upload = form
        .image
        .ok_or_else(|| ApiError::Validation("La imagen es obligatoria.".into()))?;

    // Upload first: a post row is never persisted without its image.
    let key = images::store_image(&state, "posts", actor.id, upload).await?;

    let post = repo::insert(&state.db, actor.id, &description, Some(&key)).await?;
    let joined = repo::find_with_author(&state.db, post.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post"))?;
    let data = PostResource::build(&state, joined).await?;

    info!(post_id = %post.id, user_id = %actor.id, "post created");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": true,
            "message": "Post creado correctamente",
            "data": data,
        })),
    ))
}

/// PUT /posts/:id — owner only.
#[instrument(skip(state, actor, payload))]
pub async fn update(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePostRequest>,
) -> Result<Json<Value>, ApiError> {
    let post = repo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post"))?;

    policy::require_owner(&actor, post.user_id)?;

    if payload.description.is_empty() {
        return Err(ApiError::Validation("La descripción es obligatoria.".into()));
    }
    check_max_len(
        &payload.description,
        2000,
        "La descripción no puede superar los 2000 caracteres.",
    )?;

    repo::update_description(&state.db, id, &payload.description).await?;
    let joined = repo::find_with_author(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post"))?;
    let data = PostResource::build(&state, joined).await?;

    info!(post_id = %id, user_id = %actor.id, "post updated");
    Ok(Json(json!({
        "status": true,
        "message": "Post actualizado correctamente",
        "data": data,
    })))
}

/// DELETE /posts/:id — owner or admin.
#[instrument(skip(state, actor))]
pub async fn destroy(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let post = repo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post"))?;

    policy::require_owner_or_admin(&actor, post.user_id)?;

    if !repo::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Post"));
    }

    info!(post_id = %id, actor_id = %actor.id, "post deleted");
    Ok(Json(json!({
        "status": true,
        "message": "Post eliminado correctamente",
    })))
}
