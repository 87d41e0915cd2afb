use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::jwt::AuthUser;
use crate::cats::dto::{parse_adoption_flag, CatResource, FilterQuery};
use crate::cats::repo;
use crate::error::ApiError;
use crate::forms::{self, check_max_len};
use crate::images;
use crate::pagination::Pagination;
use crate::policy;
use crate::state::AppState;
use crate::users;

/// GET /cats — admin only, paginated.
#[instrument(skip(state, actor))]
pub async fn index(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Query(page): Query<Pagination>,
) -> Result<Json<Value>, ApiError> {
    policy::require_admin(&actor)?;
    let page = page.clamped();

    let cats = repo::list(&state.db, page.limit, page.offset).await?;
    let total = repo::count(&state.db).await?;
    let data = CatResource::build_many(&state, cats).await?;

    Ok(Json(json!({
        "status": true,
        "data": data,
        "meta": { "total": total, "limit": page.limit, "offset": page.offset },
    })))
}

/// GET /cats/filter?query=
#[instrument(skip(state, _actor))]
pub async fn filter(
    State(state): State<AppState>,
    AuthUser(_actor): AuthUser,
    Query(q): Query<FilterQuery>,
) -> Result<Json<Value>, ApiError> {
    let cats = repo::filter_by_name(&state.db, &q.query).await?;
    let total = cats.len();
    let data = CatResource::build_many(&state, cats).await?;

    Ok(Json(json!({
        "status": true,
        "data": data,
        "meta": { "total": total },
    })))
}

/// GET /cats/user/:id
#[instrument(skip(state, _actor))]
pub async fn by_user(
    State(state): State<AppState>,
    AuthUser(_actor): AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if users::repo::find_by_id(&state.db, user_id).await?.is_none() {
        return Err(ApiError::not_found("Usuario"));
    }

    let cats = repo::list_by_user(&state.db, user_id).await?;
    let total = cats.len();
    let data = CatResource::build_many(&state, cats).await?;

    Ok(Json(json!({
        "status": true,
        "data": data,
        "meta": { "total": total },
    })))
}

/// GET /cats/:id
#[instrument(skip(state, _actor))]
pub async fn show(
    State(state): State<AppState>,
    AuthUser(_actor): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let cat = repo::find_with_owner(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Gato"))?;
    let data = CatResource::build(&state, cat).await?;

    Ok(Json(json!({ "status": true, "data": data })))
}

/// POST /cats — multipart; name, description, en_adopcion and image required.
#[instrument(skip(state, actor, mp))]
pub async fn create(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    mp: Multipart,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let form = forms::read_form(mp, "image").await?;

    let name = form
        .required_text("name", "El campo nombre es obligatorio")?
        .to_string();
    check_max_len(&name, 80, "El campo nombre no puede superar los 80 caracteres")?;

    let description = form
        .required_text("description", "El campo descripcion es obligatorio")?
        .to_string();
    check_max_len(
        &description,
        2000,
        "El campo descripcion no puede superar los 2000 caracteres",
    )?;

    let en_adopcion =
        parse_adoption_flag(form.required_text("en_adopcion", "El campo en adopción es obligatorio")?)?;

    let upload = form
        .image
        .ok_or_else(|| ApiError::Validation("El campo imagen es obligatorio".into()))?;

    // Upload first: a cat row is never persisted without its image.
    let key = images::store_image(&state, "cats", actor.id, upload).await?;

    let cat = repo::insert(&state.db, actor.id, &name, &description, Some(&key), en_adopcion)
        .await?;
    let joined = repo::find_with_owner(&state.db, cat.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Gato"))?;
    let data = CatResource::build(&state, joined).await?;

    info!(cat_id = %cat.id, user_id = %actor.id, "cat registered");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": true,
            "message": "Gato registrado correctamente",
            "data": data,
        })),
    ))
}

/// POST /cats/:id — partial multipart update; owner only.
#[instrument(skip(state, actor, mp))]
pub async fn update(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
    mp: Multipart,
) -> Result<Json<Value>, ApiError> {
    let cat = repo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Gato"))?;

    policy::require_owner(&actor, cat.user_id)?;

    let form = forms::read_form(mp, "image").await?;

    let name = form.text("name");
    if let Some(n) = name {
        check_max_len(n, 80, "El campo nombre no puede superar los 80 caracteres")?;
    }

    let description = form.text("description");
    if let Some(d) = description {
        check_max_len(d, 2000, "El campo descripcion no puede superar los 2000 caracteres")?;
    }

    let en_adopcion = form.text("en_adopcion").map(parse_adoption_flag).transpose()?;

    let img_key = match form.image.clone() {
        Some(upload) => Some(images::store_image(&state, "cats", actor.id, upload).await?),
        None => None,
    };

    repo::update(
        &state.db,
        id,
        name,
        description,
        img_key.as_deref(),
        en_adopcion,
    )
    .await?;
    let joined = repo::find_with_owner(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Gato"))?;
    let data = CatResource::build(&state, joined).await?;

    info!(cat_id = %id, user_id = %actor.id, "cat updated");
    Ok(Json(json!({
        "status": true,
        "message": "Información actualizada correctamente",
        "data": data,
    })))
}

/// DELETE /cats/:id — owner or admin.
#[instrument(skip(state, actor))]
pub async fn destroy(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let cat = repo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Gato"))?;

    policy::require_owner_or_admin(&actor, cat.user_id)?;

    if !repo::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Gato"));
    }

    info!(cat_id = %id, actor_id = %actor.id, "cat deleted");
    Ok(Json(json!({
        "status": true,
        "message": "Gato eliminado correctamente",
    })))
}
