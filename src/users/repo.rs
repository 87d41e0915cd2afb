use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::policy::Role;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub description: Option<String>,
    pub img_profile: Option<String>,
    pub created_at: OffsetDateTime,
}

const USER_COLUMNS: &str =
    "id, name, username, email, password_hash, description, img_profile, created_at";

pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn find_by_email(db: &PgPool, email: &str) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
    ))
    .bind(email)
    .fetch_optional(db)
    .await
}

pub async fn find_by_username(db: &PgPool, username: &str) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
    ))
    .bind(username)
    .fetch_optional(db)
    .await
}

/// Create a user and attach the default `user` role in one transaction.
pub async fn create(
    db: &PgPool,
    name: &str,
    username: &str,
    email: &str,
    password_hash: &str,
) -> sqlx::Result<User> {
    let mut tx = db.begin().await?;

    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (name, username, email, password_hash)
        VALUES ($1, $2, $3, $4)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(name)
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO user_roles (user_id, role_id)
        SELECT $1, id FROM roles WHERE name = 'user'
        "#,
    )
    .bind(user.id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(user)
}

pub async fn roles_of(db: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<Role>> {
    let names: Vec<(String,)> = sqlx::query_as(
        r#"
        SELECT r.name
        FROM roles r
        JOIN user_roles ur ON ur.role_id = r.id
        WHERE ur.user_id = $1
        ORDER BY r.name
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;

    Ok(names
        .into_iter()
        .filter_map(|(n,)| Role::from_name(&n))
        .collect())
}

pub async fn list(db: &PgPool, limit: i64, offset: i64) -> sqlx::Result<Vec<User>> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT {USER_COLUMNS} FROM users
        ORDER BY created_at DESC
        LIMIT $1 OFFSET $2
        "#
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await
}

pub async fn count(db: &PgPool) -> sqlx::Result<i64> {
    let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(db)
        .await?;
    Ok(n)
}

/// Case-insensitive substring search on the display name.
pub async fn filter_by_name(db: &PgPool, query: &str) -> sqlx::Result<Vec<User>> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT {USER_COLUMNS} FROM users
        WHERE name ILIKE '%' || $1 || '%'
        ORDER BY created_at DESC
        "#
    ))
    .bind(query)
    .fetch_all(db)
    .await
}

/// Partial profile update; absent fields keep their current value.
pub async fn update_profile(
    db: &PgPool,
    id: Uuid,
    name: Option<&str>,
    username: Option<&str>,
    description: Option<&str>,
    img_profile: Option<&str>,
) -> sqlx::Result<User> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users SET
            name = COALESCE($2, name),
            username = COALESCE($3, username),
            description = COALESCE($4, description),
            img_profile = COALESCE($5, img_profile)
        WHERE id = $1
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(name)
    .bind(username)
    .bind(description)
    .bind(img_profile)
    .fetch_one(db)
    .await
}

pub async fn update_credentials(
    db: &PgPool,
    id: Uuid,
    email: Option<&str>,
    password_hash: Option<&str>,
) -> sqlx::Result<User> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users SET
            email = COALESCE($2, email),
            password_hash = COALESCE($3, password_hash)
        WHERE id = $1
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(email)
    .bind(password_hash)
    .fetch_one(db)
    .await
}

/// Delete a user; dependent posts, cats, comments, likes, follows and role
/// rows go with it via ON DELETE CASCADE.
pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<bool> {
    let res = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(res.rows_affected() == 1)
}
