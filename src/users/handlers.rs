use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::jwt::AuthUser;
use crate::auth::password::{hash_password, is_valid_email};
use crate::error::{is_unique_violation, ApiError};
use crate::forms::{self, check_max_len};
use crate::images;
use crate::pagination::Pagination;
use crate::policy;
use crate::state::AppState;
use crate::users::dto::{FilterQuery, UpdateCredentialsRequest, UserResource};
use crate::users::repo;

async fn to_resources(
    st: &AppState,
    users: Vec<repo::User>,
) -> Result<Vec<UserResource>, ApiError> {
    let mut out = Vec::with_capacity(users.len());
    for user in users {
        let roles = repo::roles_of(&st.db, user.id).await?;
        out.push(UserResource::build(st, user, roles).await?);
    }
    Ok(out)
}

/// GET /users — admin only.
#[instrument(skip(state, actor))]
pub async fn index(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Query(page): Query<Pagination>,
) -> Result<Json<Value>, ApiError> {
    policy::require_admin(&actor)?;
    let page = page.clamped();

    let users = repo::list(&state.db, page.limit, page.offset).await?;
    let total = repo::count(&state.db).await?;
    let data = to_resources(&state, users).await?;

    Ok(Json(json!({
        "status": true,
        "data": data,
        "meta": { "total": total, "limit": page.limit, "offset": page.offset },
    })))
}

/// GET /users/filter?query=
#[instrument(skip(state, _actor))]
pub async fn filter(
    State(state): State<AppState>,
    AuthUser(_actor): AuthUser,
    Query(q): Query<FilterQuery>,
) -> Result<Json<Value>, ApiError> {
    let users = repo::filter_by_name(&state.db, &q.query).await?;
    let total = users.len();
    let data = to_resources(&state, users).await?;

    Ok(Json(json!({
        "status": true,
        "data": data,
        "meta": { "total": total },
    })))
}

/// GET /users/:id
#[instrument(skip(state, _actor))]
pub async fn show(
    State(state): State<AppState>,
    AuthUser(_actor): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let user = repo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Usuario"))?;
    let roles = repo::roles_of(&state.db, user.id).await?;
    let data = UserResource::build(&state, user, roles).await?;

    Ok(Json(json!({ "status": true, "data": data })))
}

/// POST /users/:id/profile — multipart; self only, no admin override.
#[instrument(skip(state, actor, mp))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
    mp: Multipart,
) -> Result<Json<Value>, ApiError> {
    policy::require_self(&actor, id)?;

    let form = forms::read_form(mp, "img_profile").await?;

    let name = form.text("name");
    if let Some(n) = name {
        check_max_len(n, 255, "El nombre no puede exceder los 255 caracteres.")?;
    }

    let username = form.text("username");
    if let Some(u) = username {
        check_max_len(u, 80, "El nombre de usuario no puede exceder los 80 caracteres.")?;
        if let Some(existing) = repo::find_by_username(&state.db, u).await? {
            if existing.id != id {
                return Err(ApiError::Validation("El nombre de usuario ya existe.".into()));
            }
        }
    }

    let description = form.text("description");
    if let Some(d) = description {
        check_max_len(d, 2000, "La descripción no puede superar los 2000 caracteres.")?;
    }

    // Upload before touching the row: a failed upload leaves the profile as it was.
    let img_key = match form.image.clone() {
        Some(upload) => Some(images::store_image(&state, "profiles", id, upload).await?),
        None => None,
    };

    match repo::update_profile(
        &state.db,
        id,
        name,
        username,
        description,
        img_key.as_deref(),
    )
    .await
    {
        Ok(_) => {}
        Err(e) if is_unique_violation(&e) => {
            return Err(ApiError::Validation("El nombre de usuario ya existe.".into()))
        }
        Err(e) => return Err(e.into()),
    }

    info!(user_id = %id, "profile updated");
    Ok(Json(json!({
        "status": true,
        "message": "Perfil actualizado correctamente",
    })))
}

/// POST /users/:id/credentials — self only, no admin override.
#[instrument(skip(state, actor, payload))]
pub async fn update_credentials(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCredentialsRequest>,
) -> Result<Json<Value>, ApiError> {
    policy::require_self(&actor, id)?;

    let current = repo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Usuario"))?;

    let email = match payload.email.as_deref().map(|e| e.trim().to_lowercase()) {
        Some(e) if e != current.email => {
            if !is_valid_email(&e) {
                return Err(ApiError::Validation(
                    "El email no tiene un formato valido.".into(),
                ));
            }
            check_max_len(&e, 255, "El email no puede exceder los 255 caracteres.")?;
            if repo::find_by_email(&state.db, &e).await?.is_some() {
                return Err(ApiError::Validation("El email ya existe.".into()));
            }
            Some(e)
        }
        _ => None,
    };

    let password_hash = match payload.password.as_deref() {
        Some(p) => {
            if p.len() < 8 {
                return Err(ApiError::Validation(
                    "La contraseña debe tener al menos 8 caracteres.".into(),
                ));
            }
            Some(hash_password(p)?)
        }
        None => None,
    };

    if email.is_none() && password_hash.is_none() {
        return Err(ApiError::Conflict("Credenciales ya en uso".into()));
    }

    match repo::update_credentials(&state.db, id, email.as_deref(), password_hash.as_deref()).await
    {
        Ok(_) => {}
        Err(e) if is_unique_violation(&e) => {
            return Err(ApiError::Validation("El email ya existe.".into()))
        }
        Err(e) => return Err(e.into()),
    }

    info!(user_id = %id, "credentials updated");
    Ok(Json(json!({
        "status": true,
        "message": "Credenciales actualizadas correctamente",
    })))
}

/// DELETE /users/:id — admin only; cascades to everything the user owns.
#[instrument(skip(state, actor))]
pub async fn destroy(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    policy::require_admin(&actor)?;

    if !repo::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Usuario"));
    }

    info!(user_id = %id, admin_id = %actor.id, "user deleted");
    Ok(Json(json!({
        "status": true,
        "message": "Usuario eliminado correctamente",
    })))
}
