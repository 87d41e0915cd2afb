//! Follow relation, keyed by (follower, followed). The composite primary key
//! is the duplicate guard; inserts are atomic conditional writes.

use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Follow edge joined with both users' public fields.
#[derive(Debug, Clone, FromRow)]
pub struct FollowEdge {
    pub follower_id: Uuid,
    pub follower_name: String,
    pub follower_username: String,
    pub followed_id: Uuid,
    pub followed_name: String,
    pub followed_username: String,
}

const EDGES: &str = r#"
    SELECT f.follower_id, fu.name AS follower_name, fu.username AS follower_username,
           f.followed_id, du.name AS followed_name, du.username AS followed_username
    FROM follows f
    JOIN users fu ON fu.id = f.follower_id
    JOIN users du ON du.id = f.followed_id
"#;

/// Returns false when the ordered pair already exists.
pub async fn insert(db: &PgPool, follower_id: Uuid, followed_id: Uuid) -> sqlx::Result<bool> {
    let res = sqlx::query(
        r#"
        INSERT INTO follows (follower_id, followed_id)
        VALUES ($1, $2)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(follower_id)
    .bind(followed_id)
    .execute(db)
    .await?;
    Ok(res.rows_affected() == 1)
}

/// Returns false when the ordered pair was not present.
pub async fn delete(db: &PgPool, follower_id: Uuid, followed_id: Uuid) -> sqlx::Result<bool> {
    let res = sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND followed_id = $2")
        .bind(follower_id)
        .bind(followed_id)
        .execute(db)
        .await?;
    Ok(res.rows_affected() == 1)
}

/// Users following `user_id`.
pub async fn followers_of(db: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<FollowEdge>> {
    sqlx::query_as::<_, FollowEdge>(&format!(
        "{EDGES} WHERE f.followed_id = $1 ORDER BY f.created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(db)
    .await
}

/// Users that `user_id` follows.
pub async fn following_of(db: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<FollowEdge>> {
    sqlx::query_as::<_, FollowEdge>(&format!(
        "{EDGES} WHERE f.follower_id = $1 ORDER BY f.created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(db)
    .await
}

pub async fn exists(db: &PgPool, follower_id: Uuid, followed_id: Uuid) -> sqlx::Result<bool> {
    let (exists,): (bool,) = sqlx::query_as(
        "SELECT EXISTS(SELECT 1 FROM follows WHERE follower_id = $1 AND followed_id = $2)",
    )
    .bind(follower_id)
    .bind(followed_id)
    .fetch_one(db)
    .await?;
    Ok(exists)
}
