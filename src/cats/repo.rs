use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Cat {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub en_adopcion: bool,
    pub created_at: OffsetDateTime,
}

/// Cat joined with its owner's public fields.
#[derive(Debug, Clone, FromRow)]
pub struct CatWithOwner {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub en_adopcion: bool,
    pub created_at: OffsetDateTime,
    pub owner_username: String,
}

const JOINED: &str = r#"
    SELECT c.id, c.user_id, c.name, c.description, c.image, c.en_adopcion,
           c.created_at, u.username AS owner_username
    FROM cats c
    JOIN users u ON u.id = c.user_id
"#;

pub async fn list(db: &PgPool, limit: i64, offset: i64) -> sqlx::Result<Vec<CatWithOwner>> {
    sqlx::query_as::<_, CatWithOwner>(&format!(
        "{JOINED} ORDER BY c.created_at DESC LIMIT $1 OFFSET $2"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
}

pub async fn count(db: &PgPool) -> sqlx::Result<i64> {
    let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cats")
        .fetch_one(db)
        .await?;
    Ok(n)
}

pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<CatWithOwner>> {
    sqlx::query_as::<_, CatWithOwner>(&format!(
        "{JOINED} WHERE c.user_id = $1 ORDER BY c.created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(db)
    .await
}

/// Case-insensitive substring search on the cat name.
pub async fn filter_by_name(db: &PgPool, query: &str) -> sqlx::Result<Vec<CatWithOwner>> {
    sqlx::query_as::<_, CatWithOwner>(&format!(
        "{JOINED} WHERE c.name ILIKE '%' || $1 || '%' ORDER BY c.created_at DESC"
    ))
    .bind(query)
    .fetch_all(db)
    .await
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Cat>> {
    sqlx::query_as::<_, Cat>(
        r#"
        SELECT id, user_id, name, description, image, en_adopcion, created_at
        FROM cats WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn find_with_owner(db: &PgPool, id: Uuid) -> sqlx::Result<Option<CatWithOwner>> {
    sqlx::query_as::<_, CatWithOwner>(&format!("{JOINED} WHERE c.id = $1"))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn insert(
    db: &PgPool,
    user_id: Uuid,
    name: &str,
    description: &str,
    image: Option<&str>,
    en_adopcion: bool,
) -> sqlx::Result<Cat> {
    sqlx::query_as::<_, Cat>(
        r#"
        INSERT INTO cats (user_id, name, description, image, en_adopcion)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, user_id, name, description, image, en_adopcion, created_at
        "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(description)
    .bind(image)
    .bind(en_adopcion)
    .fetch_one(db)
    .await
}

/// Partial update; absent fields keep their current value.
pub async fn update(
    db: &PgPool,
    id: Uuid,
    name: Option<&str>,
    description: Option<&str>,
    image: Option<&str>,
    en_adopcion: Option<bool>,
) -> sqlx::Result<Cat> {
    sqlx::query_as::<_, Cat>(
        r#"
        UPDATE cats SET
            name = COALESCE($2, name),
            description = COALESCE($3, description),
            image = COALESCE($4, image),
            en_adopcion = COALESCE($5, en_adopcion)
        WHERE id = $1
        RETURNING id, user_id, name, description, image, en_adopcion, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(description)
    .bind(image)
    .bind(en_adopcion)
    .fetch_one(db)
    .await
}

/// Delete a cat; its cat-post tags cascade with it.
pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<bool> {
    let res = sqlx::query("DELETE FROM cats WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(res.rows_affected() == 1)
}
