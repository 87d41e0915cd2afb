use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;
use crate::images;
use crate::policy::Role;
use crate::state::AppState;
use crate::users::repo::User;

/// Public view of a user, with the stored image key resolved to a URL.
#[derive(Debug, Serialize)]
pub struct UserResource {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub email: String,
    pub description: Option<String>,
    pub img_profile: Option<String>,
    pub roles: Vec<Role>,
    pub created_at: OffsetDateTime,
}

impl UserResource {
    pub async fn build(st: &AppState, user: User, roles: Vec<Role>) -> Result<Self, ApiError> {
        let img_profile = images::presign_opt(st, user.img_profile.as_deref()).await?;
        Ok(Self {
            id: user.id,
            name: user.name,
            username: user.username,
            email: user.email,
            description: user.description,
            img_profile,
            roles,
            created_at: user.created_at,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct FilterQuery {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCredentialsRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_never_reaches_the_wire() {
        let resource = UserResource {
            id: Uuid::new_v4(),
            name: "Ana".into(),
            username: "ana".into(),
            email: "ana@x.com".into(),
            description: None,
            img_profile: None,
            roles: vec![Role::User],
            created_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&resource).unwrap();
        assert!(json.contains("\"username\":\"ana\""));
        assert!(json.contains("\"roles\":[\"user\"]"));
        assert!(!json.contains("password"));
    }
}
