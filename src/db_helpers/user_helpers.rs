use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::DataError;
use crate::models::{default_user_settings, NewUser, User, UserRole, UserUpdate};

use super::QueryBuilder;

const USER_COLUMNS: &str = "id, email, name, status, role, settings, deleted_at, created_at, updated_at";

const INSERT_USER: &str = r#"
    INSERT INTO users (id, email, name, role, settings)
    VALUES ($1, $2, $3, $4, $5)
    RETURNING id, email, name, status, role, settings, deleted_at, created_at, updated_at
"#;

pub async fn insert_user(pool: &PgPool, new_user: &NewUser) -> Result<User, DataError> {
    let user = sqlx::query_as::<_, User>(INSERT_USER)
        .bind(Uuid::now_v7())
        .bind(&new_user.email)
        .bind(&new_user.name)
        .bind(new_user.role.unwrap_or(UserRole::User))
        .bind(new_user.settings.clone().unwrap_or_else(default_user_settings))
        .fetch_one(pool)
        .await?;
    Ok(user)
}

pub async fn insert_users(pool: &PgPool, new_users: &[NewUser]) -> Result<Vec<User>, DataError> {
    let mut tx = pool.begin().await?;
    let mut users = Vec::with_capacity(new_users.len());
    for new_user in new_users {
        let user = sqlx::query_as::<_, User>(INSERT_USER)
            .bind(Uuid::now_v7())
            .bind(&new_user.email)
            .bind(&new_user.name)
            .bind(new_user.role.unwrap_or(UserRole::User))
            .bind(new_user.settings.clone().unwrap_or_else(default_user_settings))
            .fetch_one(&mut *tx)
            .await?;
        users.push(user);
    }
    tx.commit().await?;
    Ok(users)
}

/// Insert that updates the existing row's mutable fields when the email is
/// already taken, instead of failing on the unique constraint.
pub async fn upsert_user(pool: &PgPool, new_user: &NewUser) -> Result<User, DataError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, email, name, role, settings)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO UPDATE SET name = EXCLUDED.name, updated_at = now()
        RETURNING id, email, name, status, role, settings, deleted_at, created_at, updated_at
        "#,
    )
    .bind(Uuid::now_v7())
    .bind(&new_user.email)
    .bind(&new_user.name)
    .bind(new_user.role.unwrap_or(UserRole::User))
    .bind(new_user.settings.clone().unwrap_or_else(default_user_settings))
    .fetch_one(pool)
    .await?;
    Ok(user)
}

/// Insert skipped silently on a taken email; `None` means nothing was written.
pub async fn insert_user_if_absent(
    pool: &PgPool,
    new_user: &NewUser,
) -> Result<Option<User>, DataError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, email, name, role, settings)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO NOTHING
        RETURNING id, email, name, status, role, settings, deleted_at, created_at, updated_at
        "#,
    )
    .bind(Uuid::now_v7())
    .bind(&new_user.email)
    .bind(&new_user.name)
    .bind(new_user.role.unwrap_or(UserRole::User))
    .bind(new_user.settings.clone().unwrap_or_else(default_user_settings))
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn update_user(
    pool: &PgPool,
    id: Uuid,
    UserUpdate { email, name }: UserUpdate,
) -> Result<Option<User>, DataError> {
    let (set_clause, params) = QueryBuilder::new(", ")
        .add_param("email", email)
        .add_param("name", name)
        .build();

    let query = if set_clause.is_empty() {
        format!("UPDATE users SET updated_at = now() WHERE id = $1 RETURNING {USER_COLUMNS}")
    } else {
        format!(
            "UPDATE users SET {set_clause}, updated_at = now() WHERE id = ${} RETURNING {USER_COLUMNS}",
            params.len() + 1
        )
    };

    let mut result = sqlx::query_as::<_, User>(&query);
    for param in params {
        result = result.bind(param);
    }
    let user = result.bind(id).fetch_optional(pool).await?;
    Ok(user)
}

pub async fn soft_delete_user(pool: &PgPool, id: Uuid) -> Result<Option<User>, DataError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users SET deleted_at = now(), updated_at = now()
        WHERE id = $1
        RETURNING id, email, name, status, role, settings, deleted_at, created_at, updated_at
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn restore_user(pool: &PgPool, id: Uuid) -> Result<Option<User>, DataError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users SET deleted_at = NULL, updated_at = now()
        WHERE id = $1
        RETURNING id, email, name, status, role, settings, deleted_at, created_at, updated_at
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

/// Hard delete; dependent profiles, posts, comments, and memberships go with
/// the row via the schema's cascades.
pub async fn delete_user(pool: &PgPool, id: Uuid) -> Result<Option<User>, DataError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        DELETE FROM users WHERE id = $1
        RETURNING id, email, name, status, role, settings, deleted_at, created_at, updated_at
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn list_users(pool: &PgPool) -> Result<Vec<User>, DataError> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, name, status, role, settings, deleted_at, created_at, updated_at
        FROM users ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(users)
}

pub async fn list_active_users(pool: &PgPool, limit: i64) -> Result<Vec<User>, DataError> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, name, status, role, settings, deleted_at, created_at, updated_at
        FROM users
        WHERE deleted_at IS NULL
        ORDER BY created_at DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(users)
}

pub async fn list_users_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<User>, DataError> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, name, status, role, settings, deleted_at, created_at, updated_at
        FROM users WHERE id = ANY($1)
        "#,
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;
    Ok(users)
}

pub async fn search_users(pool: &PgPool, term: &str) -> Result<Vec<User>, DataError> {
    let pattern = format!("%{term}%");
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, name, status, role, settings, deleted_at, created_at, updated_at
        FROM users
        WHERE name ILIKE $1 OR email ILIKE $1
        "#,
    )
    .bind(pattern)
    .fetch_all(pool)
    .await?;
    Ok(users)
}

/// Accounts that were soft-deleted or whose address matches the spam pattern.
pub async fn list_flagged_users(pool: &PgPool) -> Result<Vec<User>, DataError> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, name, status, role, settings, deleted_at, created_at, updated_at
        FROM users
        WHERE deleted_at IS NOT NULL OR email LIKE '%spam%'
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(users)
}
