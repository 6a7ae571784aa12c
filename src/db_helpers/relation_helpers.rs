use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::DataError;
use crate::models::{
    CommentWithAuthor, Post, PostTitle, PostWithComments, User, UserGroup, UserSummary,
    UserWithGroups, UserWithPostTitles, UserWithPosts, UserWithProfile, UserWithRelations,
};

use super::{
    get_post_by_id, get_profile_by_user_id, get_user_by_id, list_comments_for_post,
    list_users_by_ids,
};

pub async fn get_user_with_profile(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<UserWithProfile>, DataError> {
    let user = match get_user_by_id(pool, id).await? {
        Some(user) => user,
        None => return Ok(None),
    };
    let profile = get_profile_by_user_id(pool, id).await?;
    Ok(Some(UserWithProfile { user, profile }))
}

pub async fn get_user_with_relations(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<UserWithRelations>, DataError> {
    let user = match get_user_by_id(pool, id).await? {
        Some(user) => user,
        None => return Ok(None),
    };
    let profile = get_profile_by_user_id(pool, id).await?;
    let posts = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, title, content, slug, published, views, author_id, created_at, updated_at
        FROM posts
        WHERE author_id = $1
        ORDER BY id DESC
        "#,
    )
    .bind(id)
    .fetch_all(pool)
    .await?;
    Ok(Some(UserWithRelations { user, profile, posts }))
}

/// A post together with its author and every comment, each comment carrying
/// its own author. Comment authors are batch-loaded, not fetched per row.
pub async fn get_post_with_comments(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<PostWithComments>, DataError> {
    let post = match get_post_by_id(pool, id).await? {
        Some(post) => post,
        None => return Ok(None),
    };
    let author = get_user_by_id(pool, post.author_id)
        .await?
        .ok_or(DataError::NotFound("user"))?;

    let comments = list_comments_for_post(pool, id).await?;
    let mut author_ids: Vec<Uuid> = comments.iter().map(|comment| comment.author_id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();

    let authors: HashMap<Uuid, User> = list_users_by_ids(pool, &author_ids)
        .await?
        .into_iter()
        .map(|user| (user.id, user))
        .collect();

    let mut with_authors = Vec::with_capacity(comments.len());
    for comment in comments {
        let author = authors
            .get(&comment.author_id)
            .cloned()
            .ok_or(DataError::NotFound("user"))?;
        with_authors.push(CommentWithAuthor { comment, author });
    }

    Ok(Some(PostWithComments {
        post,
        author,
        comments: with_authors,
    }))
}

/// Root user plus a window of their posts; the relation is filtered, sorted,
/// and limited independently of the root lookup.
pub async fn get_user_with_recent_posts(
    pool: &PgPool,
    id: Uuid,
    since: DateTime<Utc>,
    limit: i64,
) -> Result<Option<UserWithPosts>, DataError> {
    let user = match get_user_by_id(pool, id).await? {
        Some(user) => user,
        None => return Ok(None),
    };
    let posts = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, title, content, slug, published, views, author_id, created_at, updated_at
        FROM posts
        WHERE author_id = $1 AND created_at > $2
        ORDER BY created_at DESC
        LIMIT $3
        "#,
    )
    .bind(id)
    .bind(since)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(Some(UserWithPosts { user, posts }))
}

pub async fn get_user_summary(pool: &PgPool, id: Uuid) -> Result<Option<UserSummary>, DataError> {
    let summary =
        sqlx::query_as::<_, UserSummary>("SELECT id, email, name FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(summary)
}

pub async fn get_user_with_post_titles(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<UserWithPostTitles>, DataError> {
    let user = match get_user_summary(pool, id).await? {
        Some(summary) => summary,
        None => return Ok(None),
    };
    let posts = sqlx::query_as::<_, PostTitle>(
        r#"
        SELECT id, title, published
        FROM posts
        WHERE author_id = $1
        ORDER BY id
        "#,
    )
    .bind(id)
    .fetch_all(pool)
    .await?;
    Ok(Some(UserWithPostTitles { user, posts }))
}

/// Traverses the junction table and flattens each group together with the
/// `role`/`joined_at` attributes stored on the edge.
pub async fn get_user_with_groups(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<UserWithGroups>, DataError> {
    let user = match get_user_by_id(pool, id).await? {
        Some(user) => user,
        None => return Ok(None),
    };
    let groups = sqlx::query_as::<_, UserGroup>(
        r#"
        SELECT groups.id                 AS group_id,
               groups.name               AS name,
               users_to_groups.role      AS role,
               users_to_groups.joined_at AS joined_at
        FROM users_to_groups
        JOIN groups ON users_to_groups.group_id = groups.id
        WHERE users_to_groups.user_id = $1
        ORDER BY users_to_groups.joined_at, groups.id
        "#,
    )
    .bind(id)
    .fetch_all(pool)
    .await?;
    Ok(Some(UserWithGroups { user, groups }))
}
