use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub text: String,
    pub created_at: OffsetDateTime,
}

/// Comment joined with its author's public fields.
#[derive(Debug, Clone, FromRow)]
pub struct CommentWithAuthor {
    pub id: Uuid,
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub text: String,
    pub created_at: OffsetDateTime,
    pub author_name: String,
    pub author_username: String,
    pub author_img: Option<String>,
}

const JOINED: &str = r#"
    SELECT c.id, c.user_id, c.post_id, c.text, c.created_at,
           u.name AS author_name, u.username AS author_username,
           u.img_profile AS author_img
    FROM comments c
    JOIN users u ON u.id = c.user_id
"#;

pub async fn list_all(db: &PgPool) -> sqlx::Result<Vec<CommentWithAuthor>> {
    sqlx::query_as::<_, CommentWithAuthor>(&format!("{JOINED} ORDER BY c.created_at DESC"))
        .fetch_all(db)
        .await
}

pub async fn list_by_post(db: &PgPool, post_id: Uuid) -> sqlx::Result<Vec<CommentWithAuthor>> {
    sqlx::query_as::<_, CommentWithAuthor>(&format!(
        "{JOINED} WHERE c.post_id = $1 ORDER BY c.created_at DESC"
    ))
    .bind(post_id)
    .fetch_all(db)
    .await
}

pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<CommentWithAuthor>> {
    sqlx::query_as::<_, CommentWithAuthor>(&format!(
        "{JOINED} WHERE c.user_id = $1 ORDER BY c.created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(db)
    .await
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Comment>> {
    sqlx::query_as::<_, Comment>(
        "SELECT id, user_id, post_id, text, created_at FROM comments WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn find_with_author(db: &PgPool, id: Uuid) -> sqlx::Result<Option<CommentWithAuthor>> {
    sqlx::query_as::<_, CommentWithAuthor>(&format!("{JOINED} WHERE c.id = $1"))
        .bind(id)
        .fetch_optional(db)
        .await
}

/// No uniqueness constraint: a user may comment the same post many times.
pub async fn insert(
    db: &PgPool,
    user_id: Uuid,
    post_id: Uuid,
    text: &str,
) -> sqlx::Result<Comment> {
    sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (user_id, post_id, text)
        VALUES ($1, $2, $3)
        RETURNING id, user_id, post_id, text, created_at
        "#,
    )
    .bind(user_id)
    .bind(post_id)
    .bind(text)
    .fetch_one(db)
    .await
}

pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<bool> {
    let res = sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(res.rows_affected() == 1)
}
