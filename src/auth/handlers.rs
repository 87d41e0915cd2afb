use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::auth::dto::{AuthResponse, LoginRequest, RefreshRequest, RegisterRequest};
use crate::auth::jwt::{AuthUser, JwtKeys};
use crate::auth::password::{hash_password, is_valid_email, verify_password};
use crate::error::{is_unique_violation, ApiError};
use crate::forms::check_max_len;
use crate::policy::Role;
use crate::state::AppState;
use crate::users::dto::UserResource;
use crate::users::repo;

fn issue_pair(
    keys: &JwtKeys,
    user_id: uuid::Uuid,
    roles: &[Role],
) -> Result<(String, String), ApiError> {
    let access = keys.sign_access(user_id, roles)?;
    let refresh = keys.sign_refresh(user_id, roles)?;
    Ok((access, refresh))
}

/// POST /auth/register
#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if payload.name.is_empty() {
        return Err(ApiError::Validation("El nombre es obligatorio.".into()));
    }
    check_max_len(&payload.name, 255, "El nombre no puede exceder los 255 caracteres.")?;

    if payload.username.is_empty() {
        return Err(ApiError::Validation("El nombre de usuario es obligatorio.".into()));
    }
    check_max_len(
        &payload.username,
        80,
        "El nombre de usuario no puede exceder los 80 caracteres.",
    )?;

    if !is_valid_email(&payload.email) {
        return Err(ApiError::Validation("El email no tiene un formato valido.".into()));
    }
    check_max_len(&payload.email, 255, "El email no puede exceder los 255 caracteres.")?;

    if payload.password.len() < 8 {
        return Err(ApiError::Validation(
            "La contraseña debe tener al menos 8 caracteres.".into(),
        ));
    }

    // The unique constraints remain the backstop for concurrent registrations.
    if repo::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Validation("El email ya existe.".into()));
    }
    if repo::find_by_username(&state.db, &payload.username)
        .await?
        .is_some()
    {
        return Err(ApiError::Validation("El nombre de usuario ya existe.".into()));
    }

    let hash = hash_password(&payload.password)?;
    // The pre-checks above race with concurrent registrations; the unique
    // constraints settle it.
    let user = match repo::create(
        &state.db,
        &payload.name,
        &payload.username,
        &payload.email,
        &hash,
    )
    .await
    {
        Ok(u) => u,
        Err(e) if is_unique_violation(&e) => {
            return Err(ApiError::Validation(
                "El email o el nombre de usuario ya existe.".into(),
            ))
        }
        Err(e) => return Err(e.into()),
    };
    let roles = repo::roles_of(&state.db, user.id).await?;

    let keys = JwtKeys::from_ref(&state);
    let (access_token, refresh_token) = issue_pair(&keys, user.id, &roles)?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    let data = UserResource::build(&state, user, roles).await?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            status: true,
            message: "Usuario registrado correctamente".into(),
            access_token,
            refresh_token,
            token_type: "Bearer",
            data,
        }),
    ))
}

/// POST /auth/login
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    let invalid = || ApiError::Unauthenticated("Credenciales invalidas".into());

    let user = repo::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login with invalid password");
        return Err(invalid());
    }

    let roles = repo::roles_of(&state.db, user.id).await?;
    let keys = JwtKeys::from_ref(&state);
    let (access_token, refresh_token) = issue_pair(&keys, user.id, &roles)?;

    info!(user_id = %user.id, "user logged in");
    let data = UserResource::build(&state, user, roles).await?;
    Ok(Json(AuthResponse {
        status: true,
        message: "Sesión iniciada correctamente".into(),
        access_token,
        refresh_token,
        token_type: "Bearer",
        data,
    }))
}

/// POST /auth/refresh — rotates the token pair. Roles are re-read from the
/// store so a revoked admin loses the role at the next rotation.
#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|_| ApiError::unauthenticated())?;

    let user = repo::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(ApiError::unauthenticated)?;
    let roles = repo::roles_of(&state.db, user.id).await?;

    let (access_token, refresh_token) = issue_pair(&keys, user.id, &roles)?;

    let data = UserResource::build(&state, user, roles).await?;
    Ok(Json(AuthResponse {
        status: true,
        message: "Token refrescado correctamente".into(),
        access_token,
        refresh_token,
        token_type: "Bearer",
        data,
    }))
}

/// GET /auth/me
#[instrument(skip(state, actor))]
pub async fn me(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
) -> Result<Json<Value>, ApiError> {
    let user = repo::find_by_id(&state.db, actor.id)
        .await?
        .ok_or_else(ApiError::unauthenticated)?;
    let roles = repo::roles_of(&state.db, user.id).await?;
    let data = UserResource::build(&state, user, roles).await?;

    Ok(Json(json!({ "status": true, "data": data })))
}
