use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::DataError;
use crate::models::{Comment, CommentContext, NewComment};

pub async fn insert_comment(pool: &PgPool, new_comment: &NewComment) -> Result<Comment, DataError> {
    let mut tx = pool.begin().await?;

    let post_exists: (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1)")
            .bind(new_comment.post_id)
            .fetch_one(&mut *tx)
            .await?;
    if !post_exists.0 {
        return Err(DataError::NotFound("post"));
    }

    let comment = sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (id, content, post_id, author_id)
        VALUES ($1, $2, $3, $4)
        RETURNING id, content, post_id, author_id, created_at
        "#,
    )
    .bind(Uuid::now_v7())
    .bind(&new_comment.content)
    .bind(new_comment.post_id)
    .bind(new_comment.author_id)
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;

    Ok(comment)
}

pub async fn list_comments_for_post(
    pool: &PgPool,
    post_id: Uuid,
) -> Result<Vec<Comment>, DataError> {
    let comments = sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, content, post_id, author_id, created_at
        FROM comments
        WHERE post_id = $1
        ORDER BY id
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?;
    Ok(comments)
}

/// Every comment joined with its post and its author, newest first.
pub async fn list_comments_with_context(pool: &PgPool) -> Result<Vec<CommentContext>, DataError> {
    let rows = sqlx::query_as::<_, CommentContext>(
        r#"
        SELECT comments.id         AS comment_id,
               comments.content    AS comment_content,
               comments.created_at AS commented_at,
               posts.id            AS post_id,
               posts.title         AS post_title,
               users.id            AS author_id,
               users.name          AS author_name
        FROM comments
        JOIN posts ON comments.post_id = posts.id
        JOIN users ON comments.author_id = users.id
        ORDER BY comments.id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn delete_comment(pool: &PgPool, id: Uuid) -> Result<Option<Comment>, DataError> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        DELETE FROM comments WHERE id = $1
        RETURNING id, content, post_id, author_id, created_at
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(comment)
}
