use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::DataError;
use crate::models::{Group, GroupMember, GroupMembership};

pub async fn insert_group(pool: &PgPool, name: &str) -> Result<Group, DataError> {
    let group = sqlx::query_as::<_, Group>(
        r#"
        INSERT INTO groups (id, name)
        VALUES ($1, $2)
        RETURNING id, name
        "#,
    )
    .bind(Uuid::now_v7())
    .bind(name)
    .fetch_one(pool)
    .await?;
    Ok(group)
}

pub async fn get_group_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Group>, DataError> {
    let group = sqlx::query_as::<_, Group>("SELECT id, name FROM groups WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(group)
}

pub async fn list_groups(pool: &PgPool) -> Result<Vec<Group>, DataError> {
    let groups = sqlx::query_as::<_, Group>("SELECT id, name FROM groups ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(groups)
}

/// Idempotent membership: joining twice keeps the single junction row and
/// refreshes the role on the edge.
pub async fn join_group(
    pool: &PgPool,
    user_id: Uuid,
    group_id: Uuid,
    role: Option<&str>,
) -> Result<GroupMembership, DataError> {
    let membership = sqlx::query_as::<_, GroupMembership>(
        r#"
        INSERT INTO users_to_groups (user_id, group_id, role)
        VALUES ($1, $2, COALESCE($3, 'member'))
        ON CONFLICT (user_id, group_id) DO UPDATE SET role = EXCLUDED.role
        RETURNING user_id, group_id, role, joined_at
        "#,
    )
    .bind(user_id)
    .bind(group_id)
    .bind(role)
    .fetch_one(pool)
    .await?;
    Ok(membership)
}

pub async fn leave_group(
    pool: &PgPool,
    user_id: Uuid,
    group_id: Uuid,
) -> Result<Option<GroupMembership>, DataError> {
    let membership = sqlx::query_as::<_, GroupMembership>(
        r#"
        DELETE FROM users_to_groups
        WHERE user_id = $1 AND group_id = $2
        RETURNING user_id, group_id, role, joined_at
        "#,
    )
    .bind(user_id)
    .bind(group_id)
    .fetch_optional(pool)
    .await?;
    Ok(membership)
}

pub async fn list_group_members(
    pool: &PgPool,
    group_id: Uuid,
) -> Result<Vec<GroupMember>, DataError> {
    let members = sqlx::query_as::<_, GroupMember>(
        r#"
        SELECT users.id                  AS user_id,
               users.name                AS name,
               users.email               AS email,
               users_to_groups.role      AS role,
               users_to_groups.joined_at AS joined_at
        FROM users_to_groups
        JOIN users ON users_to_groups.user_id = users.id
        WHERE users_to_groups.group_id = $1
        ORDER BY users_to_groups.joined_at, users.id
        "#,
    )
    .bind(group_id)
    .fetch_all(pool)
    .await?;
    Ok(members)
}

pub async fn list_user_memberships(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<GroupMembership>, DataError> {
    let memberships = sqlx::query_as::<_, GroupMembership>(
        r#"
        SELECT user_id, group_id, role, joined_at
        FROM users_to_groups
        WHERE user_id = $1
        ORDER BY joined_at, group_id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(memberships)
}
