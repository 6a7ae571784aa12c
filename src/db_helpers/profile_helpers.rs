use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::DataError;
use crate::models::{NewProfile, Profile, ProfileUpdate};

use super::QueryBuilder;

const PROFILE_COLUMNS: &str = "id, user_id, bio, avatar_url, website, created_at";

pub async fn insert_profile(pool: &PgPool, new_profile: &NewProfile) -> Result<Profile, DataError> {
    let profile = sqlx::query_as::<_, Profile>(
        r#"
        INSERT INTO profiles (id, user_id, bio, avatar_url, website)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, user_id, bio, avatar_url, website, created_at
        "#,
    )
    .bind(Uuid::now_v7())
    .bind(new_profile.user_id)
    .bind(&new_profile.bio)
    .bind(&new_profile.avatar_url)
    .bind(&new_profile.website)
    .fetch_one(pool)
    .await?;
    Ok(profile)
}

pub async fn get_profile_by_user_id(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<Profile>, DataError> {
    let profile = sqlx::query_as::<_, Profile>(
        r#"
        SELECT id, user_id, bio, avatar_url, website, created_at
        FROM profiles WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(profile)
}

pub async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    ProfileUpdate {
        bio,
        avatar_url,
        website,
    }: ProfileUpdate,
) -> Result<Option<Profile>, DataError> {
    let (set_clause, params) = QueryBuilder::new(", ")
        .add_param("bio", bio)
        .add_param("avatar_url", avatar_url)
        .add_param("website", website)
        .build();

    if set_clause.is_empty() {
        return get_profile_by_user_id(pool, user_id).await;
    }

    let query = format!(
        "UPDATE profiles SET {set_clause} WHERE user_id = ${} RETURNING {PROFILE_COLUMNS}",
        params.len() + 1
    );

    let mut result = sqlx::query_as::<_, Profile>(&query);
    for param in params {
        result = result.bind(param);
    }
    let profile = result.bind(user_id).fetch_optional(pool).await?;
    Ok(profile)
}
