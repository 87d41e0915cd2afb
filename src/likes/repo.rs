//! Like relation, keyed by (user, post). The table's primary key is the
//! duplicate guard: inserts are atomic conditional writes, so two concurrent
//! likes from the same user cannot both land.

use sqlx::PgPool;
use uuid::Uuid;

/// Returns false when the pair already exists.
pub async fn insert(db: &PgPool, user_id: Uuid, post_id: Uuid) -> sqlx::Result<bool> {
    let res = sqlx::query(
        r#"
        INSERT INTO likes (user_id, post_id)
        VALUES ($1, $2)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(post_id)
    .execute(db)
    .await?;
    Ok(res.rows_affected() == 1)
}

/// Returns false when the pair was not present.
pub async fn delete(db: &PgPool, user_id: Uuid, post_id: Uuid) -> sqlx::Result<bool> {
    let res = sqlx::query("DELETE FROM likes WHERE user_id = $1 AND post_id = $2")
        .bind(user_id)
        .bind(post_id)
        .execute(db)
        .await?;
    Ok(res.rows_affected() == 1)
}

pub async fn is_liked(db: &PgPool, user_id: Uuid, post_id: Uuid) -> sqlx::Result<bool> {
    let (exists,): (bool,) = sqlx::query_as(
        "SELECT EXISTS(SELECT 1 FROM likes WHERE user_id = $1 AND post_id = $2)",
    )
    .bind(user_id)
    .bind(post_id)
    .fetch_one(db)
    .await?;
    Ok(exists)
}

pub async fn count_for_post(db: &PgPool, post_id: Uuid) -> sqlx::Result<i64> {
    let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM likes WHERE post_id = $1")
        .bind(post_id)
        .fetch_one(db)
        .await?;
    Ok(n)
}
