use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;
use crate::images;
use crate::posts::repo::PostWithAuthor;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AuthorRef {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub img_profile: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PostResource {
    pub id: Uuid,
    pub description: String,
    pub image: Option<String>,
    pub author: AuthorRef,
    pub created_at: OffsetDateTime,
}

impl PostResource {
    pub async fn build(st: &AppState, post: PostWithAuthor) -> Result<Self, ApiError> {
        let image = images::presign_opt(st, post.image.as_deref()).await?;
        let img_profile = images::presign_opt(st, post.author_img.as_deref()).await?;
        Ok(Self {
            id: post.id,
            description: post.description,
            image,
            author: AuthorRef {
                id: post.user_id,
                name: post.author_name,
                username: post.author_username,
                img_profile,
            },
            created_at: post.created_at,
        })
    }

    pub async fn build_many(
        st: &AppState,
        posts: Vec<PostWithAuthor>,
    ) -> Result<Vec<Self>, ApiError> {
        let mut out = Vec::with_capacity(posts.len());
        for post in posts {
            out.push(Self::build(st, post).await?);
        }
        Ok(out)
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub description: String,
}
