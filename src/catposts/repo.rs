//! Cat-post tag relation. The (cat, post) unique constraint is the duplicate
//! guard; inserts are atomic conditional writes.

use sqlx::PgPool;
use uuid::Uuid;

use crate::cats::repo::CatWithOwner;
use crate::posts::repo::PostWithAuthor;

/// Returns false when the pair is already tagged.
pub async fn insert(db: &PgPool, cat_id: Uuid, post_id: Uuid) -> sqlx::Result<bool> {
    let res = sqlx::query(
        r#"
        INSERT INTO cat_posts (cat_id, post_id)
        VALUES ($1, $2)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(cat_id)
    .bind(post_id)
    .execute(db)
    .await?;
    Ok(res.rows_affected() == 1)
}

/// Returns false when the pair was not tagged.
pub async fn delete(db: &PgPool, cat_id: Uuid, post_id: Uuid) -> sqlx::Result<bool> {
    let res = sqlx::query("DELETE FROM cat_posts WHERE cat_id = $1 AND post_id = $2")
        .bind(cat_id)
        .bind(post_id)
        .execute(db)
        .await?;
    Ok(res.rows_affected() == 1)
}

/// Cats tagged in a post.
pub async fn cats_of_post(db: &PgPool, post_id: Uuid) -> sqlx::Result<Vec<CatWithOwner>> {
    sqlx::query_as::<_, CatWithOwner>(
        r#"
        SELECT c.id, c.user_id, c.name, c.description, c.image, c.en_adopcion,
               c.created_at, u.username AS owner_username
        FROM cat_posts cp
        JOIN cats c ON c.id = cp.cat_id
        JOIN users u ON u.id = c.user_id
        WHERE cp.post_id = $1
        ORDER BY c.created_at DESC
        "#,
    )
    .bind(post_id)
    .fetch_all(db)
    .await
}

/// Posts a cat is tagged in.
pub async fn posts_of_cat(db: &PgPool, cat_id: Uuid) -> sqlx::Result<Vec<PostWithAuthor>> {
    sqlx::query_as::<_, PostWithAuthor>(
        r#"
        SELECT p.id, p.user_id, p.description, p.image, p.created_at,
               u.name AS author_name, u.username AS author_username,
               u.img_profile AS author_img
        FROM cat_posts cp
        JOIN posts p ON p.id = cp.post_id
        JOIN users u ON u.id = p.user_id
        WHERE cp.cat_id = $1
        ORDER BY p.created_at DESC
        "#,
    )
    .bind(cat_id)
    .fetch_all(db)
    .await
}
