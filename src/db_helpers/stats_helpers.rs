use sqlx::PgPool;

use crate::errors::DataError;
use crate::models::{AuthorPostCount, AuthorStats, UserPostStats, ViewsRange};

pub async fn count_users(pool: &PgPool) -> Result<i64, DataError> {
    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    Ok(total)
}

pub async fn count_active_users(pool: &PgPool) -> Result<i64, DataError> {
    let total =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE deleted_at IS NULL")
            .fetch_one(pool)
            .await?;
    Ok(total)
}

pub async fn count_published_posts(pool: &PgPool) -> Result<i64, DataError> {
    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts WHERE published")
        .fetch_one(pool)
        .await?;
    Ok(total)
}

pub async fn count_distinct_authors(pool: &PgPool) -> Result<i64, DataError> {
    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(DISTINCT author_id) FROM posts")
        .fetch_one(pool)
        .await?;
    Ok(total)
}

pub async fn total_post_views(pool: &PgPool) -> Result<i64, DataError> {
    let total =
        sqlx::query_scalar::<_, i64>("SELECT COALESCE(SUM(views), 0)::bigint FROM posts")
            .fetch_one(pool)
            .await?;
    Ok(total)
}

/// `None` when there are no posts at all.
pub async fn average_post_views(pool: &PgPool) -> Result<Option<f64>, DataError> {
    let average =
        sqlx::query_scalar::<_, Option<f64>>("SELECT AVG(views)::double precision FROM posts")
            .fetch_one(pool)
            .await?;
    Ok(average)
}

pub async fn post_views_range(pool: &PgPool) -> Result<ViewsRange, DataError> {
    let range = sqlx::query_as::<_, ViewsRange>(
        "SELECT MIN(views) AS min_views, MAX(views) AS max_views FROM posts",
    )
    .fetch_one(pool)
    .await?;
    Ok(range)
}

pub async fn post_counts_by_author(pool: &PgPool) -> Result<Vec<AuthorPostCount>, DataError> {
    let counts = sqlx::query_as::<_, AuthorPostCount>(
        r#"
        SELECT author_id,
               COUNT(*)                       AS post_count,
               COALESCE(SUM(views), 0)::bigint AS total_views
        FROM posts
        GROUP BY author_id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(counts)
}

/// Per-user stats including users with no posts, busiest authors first.
pub async fn author_stats(pool: &PgPool) -> Result<Vec<AuthorStats>, DataError> {
    let stats = sqlx::query_as::<_, AuthorStats>(
        r#"
        SELECT users.id              AS author_id,
               users.name            AS author_name,
               COUNT(posts.id)       AS post_count,
               SUM(posts.views)::bigint AS total_views
        FROM users
        LEFT JOIN posts ON posts.author_id = users.id
        GROUP BY users.id, users.name
        ORDER BY COUNT(posts.id) DESC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(stats)
}

/// Authors with strictly more than `min_posts` posts; a count at the
/// threshold is excluded.
pub async fn prolific_authors(
    pool: &PgPool,
    min_posts: i64,
) -> Result<Vec<AuthorPostCount>, DataError> {
    let authors = sqlx::query_as::<_, AuthorPostCount>(
        r#"
        SELECT author_id,
               COUNT(*)                        AS post_count,
               COALESCE(SUM(views), 0)::bigint AS total_views
        FROM posts
        GROUP BY author_id
        HAVING COUNT(*) > $1
        "#,
    )
    .bind(min_posts)
    .fetch_all(pool)
    .await?;
    Ok(authors)
}

pub async fn users_with_post_stats(pool: &PgPool) -> Result<Vec<UserPostStats>, DataError> {
    let stats = sqlx::query_as::<_, UserPostStats>(
        r#"
        SELECT users.id, users.name, users.email, post_stats.post_count, post_stats.total_views
        FROM users
        LEFT JOIN (
            SELECT author_id,
                   COUNT(*)           AS post_count,
                   SUM(views)::bigint AS total_views
            FROM posts
            GROUP BY author_id
        ) post_stats ON post_stats.author_id = users.id
        ORDER BY users.id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(stats)
}
