use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cats::repo::CatWithOwner;
use crate::error::ApiError;
use crate::images;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct OwnerRef {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct CatResource {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub en_adopcion: bool,
    pub owner: OwnerRef,
}

impl CatResource {
    pub async fn build(st: &AppState, cat: CatWithOwner) -> Result<Self, ApiError> {
        let image = images::presign_opt(st, cat.image.as_deref()).await?;
        Ok(Self {
            id: cat.id,
            name: cat.name,
            description: cat.description,
            image,
            en_adopcion: cat.en_adopcion,
            owner: OwnerRef {
                id: cat.user_id,
                username: cat.owner_username,
            },
        })
    }

    pub async fn build_many(
        st: &AppState,
        cats: Vec<CatWithOwner>,
    ) -> Result<Vec<Self>, ApiError> {
        let mut out = Vec::with_capacity(cats.len());
        for cat in cats {
            out.push(Self::build(st, cat).await?);
        }
        Ok(out)
    }
}

#[derive(Debug, Deserialize)]
pub struct FilterQuery {
    pub query: String,
}

/// Parse the `en_adopcion` form field. Only the literal strings "true" and
/// "false" are accepted.
pub fn parse_adoption_flag(value: &str) -> Result<bool, ApiError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ApiError::Validation(
            "El campo en_adopcion solo puede ser \"true\" o \"false\".".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adoption_flag_accepts_only_literal_booleans() {
        assert!(parse_adoption_flag("true").unwrap());
        assert!(!parse_adoption_flag("false").unwrap());
        assert!(parse_adoption_flag("yes").is_err());
        assert!(parse_adoption_flag("TRUE").is_err());
        assert!(parse_adoption_flag("1").is_err());
    }
}
