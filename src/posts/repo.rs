use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub description: String,
    pub image: Option<String>,
    pub created_at: OffsetDateTime,
}

/// Post joined with its author's public fields, as rendered in responses.
#[derive(Debug, Clone, FromRow)]
pub struct PostWithAuthor {
    pub id: Uuid,
    pub user_id: Uuid,
    pub description: String,
    pub image: Option<String>,
    pub created_at: OffsetDateTime,
    pub author_name: String,
    pub author_username: String,
    pub author_img: Option<String>,
}

const JOINED: &str = r#"
    SELECT p.id, p.user_id, p.description, p.image, p.created_at,
           u.name AS author_name, u.username AS author_username,
           u.img_profile AS author_img
    FROM posts p
    JOIN users u ON u.id = p.user_id
"#;

pub async fn list_all(db: &PgPool) -> sqlx::Result<Vec<PostWithAuthor>> {
    sqlx::query_as::<_, PostWithAuthor>(&format!("{JOINED} ORDER BY p.created_at DESC"))
        .fetch_all(db)
        .await
}

pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<PostWithAuthor>> {
    sqlx::query_as::<_, PostWithAuthor>(&format!(
        "{JOINED} WHERE p.user_id = $1 ORDER BY p.created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(db)
    .await
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Post>> {
    sqlx::query_as::<_, Post>(
        "SELECT id, user_id, description, image, created_at FROM posts WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn find_with_author(db: &PgPool, id: Uuid) -> sqlx::Result<Option<PostWithAuthor>> {
    sqlx::query_as::<_, PostWithAuthor>(&format!("{JOINED} WHERE p.id = $1"))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn count(db: &PgPool) -> sqlx::Result<i64> {
    let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts")
        .fetch_one(db)
        .await?;
    Ok(n)
}

pub async fn insert(
    db: &PgPool,
    user_id: Uuid,
    description: &str,
    image: Option<&str>,
) -> sqlx::Result<Post> {
    sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (user_id, description, image)
        VALUES ($1, $2, $3)
        RETURNING id, user_id, description, image, created_at
        "#,
    )
    .bind(user_id)
    .bind(description)
    .bind(image)
    .fetch_one(db)
    .await
}

pub async fn update_description(db: &PgPool, id: Uuid, description: &str) -> sqlx::Result<Post> {
    sqlx::query_as::<_, Post>(
        r#"
        UPDATE posts SET description = $2
        WHERE id = $1
        RETURNING id, user_id, description, image, created_at
        "#,
    )
    .bind(id)
    .bind(description)
    .fetch_one(db)
    .await
}

/// Delete a post; comments, likes and cat tags cascade with it.
pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<bool> {
    let res = sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(res.rows_affected() == 1)
}
