//! Authorization policy: pure decisions over (actor, action, target owner).
//!
//! Every function is deterministic and side-effect free; handlers call these
//! before touching the store. Authentication itself (anonymous vs. actor) is
//! enforced earlier by the `AuthUser` extractor.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "user" => Some(Self::User),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    pub fn as_name(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

/// Authenticated identity performing a request. The role set is fixed at
/// authentication time (embedded in the access token), so policy checks are
/// plain set-membership tests.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: Uuid,
    pub roles: HashSet<Role>,
}

impl Actor {
    pub fn new(id: Uuid, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            id,
            roles: roles.into_iter().collect(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }
}

/// Updates to a Post or Cat: owner only. Admins get no override here.
pub fn require_owner(actor: &Actor, owner_id: Uuid) -> Result<(), ApiError> {
    if actor.id == owner_id {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

/// Deletes of a Post, Cat or Comment: the owner, or any admin.
pub fn require_owner_or_admin(actor: &Actor, owner_id: Uuid) -> Result<(), ApiError> {
    if actor.id == owner_id || actor.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

/// Admin-only surfaces: list all users/cats/comments, delete arbitrary users.
pub fn require_admin(actor: &Actor) -> Result<(), ApiError> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

/// Profile and credential updates apply to the actor's own account only.
/// Deliberately no admin override: an admin cannot reset another user's
/// password through this policy.
pub fn require_self(actor: &Actor, user_id: Uuid) -> Result<(), ApiError> {
    if actor.id == user_id {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_user() -> Actor {
        Actor::new(Uuid::new_v4(), [Role::User])
    }

    fn admin() -> Actor {
        Actor::new(Uuid::new_v4(), [Role::User, Role::Admin])
    }

    #[test]
    fn owner_may_update_non_owner_may_not() {
        let actor = plain_user();
        assert!(require_owner(&actor, actor.id).is_ok());
        assert!(matches!(
            require_owner(&actor, Uuid::new_v4()),
            Err(ApiError::Forbidden)
        ));
    }

    #[test]
    fn admin_cannot_update_someone_elses_entity() {
        let actor = admin();
        assert!(matches!(
            require_owner(&actor, Uuid::new_v4()),
            Err(ApiError::Forbidden)
        ));
    }

    #[test]
    fn delete_allows_owner_or_admin() {
        let owner = plain_user();
        let stranger = plain_user();
        let boss = admin();
        assert!(require_owner_or_admin(&owner, owner.id).is_ok());
        assert!(require_owner_or_admin(&boss, owner.id).is_ok());
        assert!(matches!(
            require_owner_or_admin(&stranger, owner.id),
            Err(ApiError::Forbidden)
        ));
    }

    #[test]
    fn admin_surfaces_reject_plain_users() {
        assert!(require_admin(&admin()).is_ok());
        assert!(matches!(
            require_admin(&plain_user()),
            Err(ApiError::Forbidden)
        ));
    }

    #[test]
    fn self_check_has_no_admin_override() {
        let target = Uuid::new_v4();
        assert!(matches!(
            require_self(&admin(), target),
            Err(ApiError::Forbidden)
        ));
        let me = plain_user();
        assert!(require_self(&me, me.id).is_ok());
    }

    #[test]
    fn decisions_are_deterministic() {
        let actor = plain_user();
        let target = Uuid::new_v4();
        for _ in 0..3 {
            assert!(matches!(
                require_owner(&actor, target),
                Err(ApiError::Forbidden)
            ));
        }
    }

    #[test]
    fn role_names_round_trip() {
        assert_eq!(Role::from_name("admin"), Some(Role::Admin));
        assert_eq!(Role::from_name("user"), Some(Role::User));
        assert_eq!(Role::from_name("root"), None);
        assert_eq!(Role::Admin.as_name(), "admin");
    }
}
