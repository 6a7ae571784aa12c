use sqlx::{Acquire, PgPool};
use uuid::Uuid;

use crate::errors::DataError;
use crate::models::{
    default_user_settings, Comment, CommentDraft, NewPost, NewProfile, NewUser, Post, Profile,
    User, UserRole,
};

/// Creates a user and their profile in one transaction; a failure on either
/// insert leaves neither row behind.
pub async fn create_user_with_profile(
    pool: &PgPool,
    new_user: &NewUser,
    bio: &str,
) -> Result<(User, Profile), DataError> {
    let mut tx = pool.begin().await?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, email, name, role, settings)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, email, name, status, role, settings, deleted_at, created_at, updated_at
        "#,
    )
    .bind(Uuid::now_v7())
    .bind(&new_user.email)
    .bind(&new_user.name)
    .bind(new_user.role.unwrap_or(UserRole::User))
    .bind(new_user.settings.clone().unwrap_or_else(default_user_settings))
    .fetch_one(&mut *tx)
    .await?;

    let new_profile = NewProfile {
        user_id: user.id,
        bio: Some(bio.to_owned()),
        ..Default::default()
    };
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
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok((user, profile))
}

/// Creates a post, then attempts the comment batch inside a nested
/// transaction (a savepoint). If any comment insert fails, only the comments
/// roll back and the post is still committed.
pub async fn create_post_with_comments(
    pool: &PgPool,
    new_post: &NewPost,
    drafts: &[CommentDraft],
) -> Result<(Post, Vec<Comment>), DataError> {
    let mut tx = pool.begin().await?;

    let post = sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (id, title, content, slug, published, author_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, title, content, slug, published, views, author_id, created_at, updated_at
        "#,
    )
    .bind(Uuid::now_v7())
    .bind(&new_post.title)
    .bind(&new_post.content)
    .bind(&new_post.slug)
    .bind(new_post.published)
    .bind(new_post.author_id)
    .fetch_one(&mut *tx)
    .await?;

    let mut comments = Vec::new();
    if !drafts.is_empty() {
        let mut inner = tx.begin().await?;
        let mut inserted = Vec::with_capacity(drafts.len());
        let mut batch_error = None;
        for draft in drafts {
            let result = sqlx::query_as::<_, Comment>(
                r#"
                INSERT INTO comments (id, content, post_id, author_id)
                VALUES ($1, $2, $3, $4)
                RETURNING id, content, post_id, author_id, created_at
                "#,
            )
            .bind(Uuid::now_v7())
            .bind(&draft.content)
            .bind(post.id)
            .bind(draft.author_id)
            .fetch_one(&mut *inner)
            .await;
            match result {
                Ok(comment) => inserted.push(comment),
                Err(error) => {
                    batch_error = Some(error);
                    break;
                }
            }
        }
        match batch_error {
            Some(error) => {
                tracing::warn!(%error, post_id = %post.id, "comment batch failed, keeping post");
                inner.rollback().await?;
            }
            None => {
                inner.commit().await?;
                comments = inserted;
            }
        }
    }

    tx.commit().await?;
    Ok((post, comments))
}

/// Moves every post of `from` to `to` under serializable isolation, so a
/// concurrent insert or transfer forces one side to retry instead of
/// interleaving.
pub async fn transfer_posts(
    pool: &PgPool,
    from: Uuid,
    to: Uuid,
) -> Result<Vec<Post>, DataError> {
    let mut tx = pool.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
        .execute(&mut *tx)
        .await?;

    let recipient: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM users WHERE id = $1 AND deleted_at IS NULL")
            .bind(to)
            .fetch_optional(&mut *tx)
            .await?;
    if recipient.is_none() {
        return Err(DataError::NotFound("user"));
    }

    let posts = sqlx::query_as::<_, Post>(
        r#"
        UPDATE posts SET author_id = $2, updated_at = now()
        WHERE author_id = $1
        RETURNING id, title, content, slug, published, views, author_id, created_at, updated_at
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(posts)
}
