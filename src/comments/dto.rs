use serde::{Deserialize, Serialize};
use serde_json::json;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::comments::repo::CommentWithAuthor;
use crate::error::ApiError;
use crate::images;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CommentResource {
    pub id: Uuid,
    pub text: String,
    pub user: serde_json::Value,
    pub post: serde_json::Value,
    pub created_at: OffsetDateTime,
}

impl CommentResource {
    pub async fn build(st: &AppState, c: CommentWithAuthor) -> Result<Self, ApiError> {
        let img_profile = images::presign_opt(st, c.author_img.as_deref()).await?;
        Ok(Self {
            id: c.id,
            text: c.text,
            user: json!({
                "id": c.user_id,
                "name": c.author_name,
                "username": c.author_username,
                "img_profile": img_profile,
            }),
            post: json!({ "id": c.post_id }),
            created_at: c.created_at,
        })
    }

    pub async fn build_many(
        st: &AppState,
        comments: Vec<CommentWithAuthor>,
    ) -> Result<Vec<Self>, ApiError> {
        let mut out = Vec::with_capacity(comments.len());
        for c in comments {
            out.push(Self::build(st, c).await?);
        }
        Ok(out)
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub post_id: Uuid,
    pub text: String,
}
