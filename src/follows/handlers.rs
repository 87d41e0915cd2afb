use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::jwt::AuthUser;
use crate::error::ApiError;
use crate::follows::repo::{self, FollowEdge};
use crate::state::AppState;
use crate::users;

#[derive(Debug, Deserialize)]
pub struct FollowRequest {
    pub followed_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct UserRef {
    pub id: Uuid,
    pub name: String,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct FollowResource {
    pub follower: UserRef,
    pub followed: UserRef,
}

impl From<FollowEdge> for FollowResource {
    fn from(e: FollowEdge) -> Self {
        Self {
            follower: UserRef {
                id: e.follower_id,
                name: e.follower_name,
                username: e.follower_username,
            },
            followed: UserRef {
                id: e.followed_id,
                name: e.followed_name,
                username: e.followed_username,
            },
        }
    }
}

/// GET /follows/followers/:id
#[instrument(skip(state, _actor))]
pub async fn followers(
    State(state): State<AppState>,
    AuthUser(_actor): AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if users::repo::find_by_id(&state.db, user_id).await?.is_none() {
        return Err(ApiError::not_found("Usuario"));
    }

    let data: Vec<FollowResource> = repo::followers_of(&state.db, user_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(json!({ "status": true, "data": data })))
}

/// GET /follows/following/:id
#[instrument(skip(state, _actor))]
pub async fn following(
    State(state): State<AppState>,
    AuthUser(_actor): AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if users::repo::find_by_id(&state.db, user_id).await?.is_none() {
        return Err(ApiError::not_found("Usuario"));
    }

    let data: Vec<FollowResource> = repo::following_of(&state.db, user_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(json!({ "status": true, "data": data })))
}

/// GET /follows/isfollowing/:id — does the actor follow user :id?
#[instrument(skip(state, actor))]
pub async fn is_following(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let is_following = repo::exists(&state.db, actor.id, user_id).await?;
    Ok(Json(json!({ "status": true, "isFollowing": is_following })))
}

/// GET /follows/isfollowed/:id — does user :id follow the actor?
#[instrument(skip(state, actor))]
pub async fn is_followed(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let is_followed = repo::exists(&state.db, user_id, actor.id).await?;
    Ok(Json(json!({ "status": true, "isFollowed": is_followed })))
}

/// POST /follows — the actor starts following `followed_id`.
///
/// Self-follow is deliberately not rejected; the data model allows it.
#[instrument(skip(state, actor, payload))]
pub async fn create(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Json(payload): Json<FollowRequest>,
) -> Result<Json<Value>, ApiError> {
    if users::repo::find_by_id(&state.db, payload.followed_id)
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound(
            "El usuario al que quiere seguir no existe.".into(),
        ));
    }

    if !repo::insert(&state.db, actor.id, payload.followed_id).await? {
        return Err(ApiError::Conflict("Ya sigues a ese usuario".into()));
    }

    info!(follower_id = %actor.id, followed_id = %payload.followed_id, "follow created");
    Ok(Json(json!({
        "status": true,
        "message": "Usuario seguido",
    })))
}

/// DELETE /follows/unfollow/:id
#[instrument(skip(state, actor))]
pub async fn destroy(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(followed_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if !repo::delete(&state.db, actor.id, followed_id).await? {
        return Err(ApiError::NotFound(
            "No estás siguiendo a este usuario".into(),
        ));
    }

    info!(follower_id = %actor.id, followed_id = %followed_id, "follow removed");
    Ok(Json(json!({
        "status": true,
        "message": "Has dejado de seguir a este usuario",
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follow_resource_carries_both_endpoints() {
        let edge = FollowEdge {
            follower_id: Uuid::new_v4(),
            follower_name: "Ana".into(),
            follower_username: "ana".into(),
            followed_id: Uuid::new_v4(),
            followed_name: "Bea".into(),
            followed_username: "bea".into(),
        };
        let resource = FollowResource::from(edge.clone());
        assert_eq!(resource.follower.id, edge.follower_id);
        assert_eq!(resource.followed.id, edge.followed_id);

        let json = serde_json::to_value(&resource).unwrap();
        assert_eq!(json["follower"]["username"], "ana");
        assert_eq!(json["followed"]["username"], "bea");
    }
}
