use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::DataError;
use crate::models::{NewPost, Post, PostUpdate, PostWithAuthor, UserPostRow};

use super::{Pagination, QueryBuilder};

const POST_COLUMNS: &str = "id, title, content, slug, published, views, author_id, created_at, updated_at";

const INSERT_POST: &str = r#"
    INSERT INTO posts (id, title, content, slug, published, author_id)
    VALUES ($1, $2, $3, $4, $5, $6)
    RETURNING id, title, content, slug, published, views, author_id, created_at, updated_at
"#;

/// Optional filters for post listings. Absent filters are left out of the
/// query entirely rather than matched against everything.
#[derive(Debug, Clone, Default)]
pub struct PostFilters {
    pub published: Option<bool>,
    pub author_id: Option<Uuid>,
    pub search: Option<String>,
}

pub async fn insert_post(pool: &PgPool, new_post: &NewPost) -> Result<Post, DataError> {
    let post = sqlx::query_as::<_, Post>(INSERT_POST)
        .bind(Uuid::now_v7())
        .bind(&new_post.title)
        .bind(&new_post.content)
        .bind(&new_post.slug)
        .bind(new_post.published)
        .bind(new_post.author_id)
        .fetch_one(pool)
        .await?;
    Ok(post)
}

pub async fn filter_posts(pool: &PgPool, filters: &PostFilters) -> Result<Vec<Post>, DataError> {
    let mut query = format!("SELECT {POST_COLUMNS} FROM posts WHERE 1=1");
    let mut next_param = 0;
    if filters.published.is_some() {
        next_param += 1;
        query.push_str(&format!(" AND published = ${next_param}"));
    }
    if filters.author_id.is_some() {
        next_param += 1;
        query.push_str(&format!(" AND author_id = ${next_param}"));
    }
    if filters.search.is_some() {
        next_param += 1;
        query.push_str(&format!(" AND title ILIKE ${next_param}"));
    }
    query.push_str(" ORDER BY id DESC");

    let mut result = sqlx::query_as::<_, Post>(&query);
    if let Some(published) = filters.published {
        result = result.bind(published);
    }
    if let Some(author_id) = filters.author_id {
        result = result.bind(author_id);
    }
    if let Some(search) = &filters.search {
        result = result.bind(format!("%{search}%"));
    }

    let posts = result.fetch_all(pool).await?;
    Ok(posts)
}

pub async fn list_recent_posts(pool: &PgPool, page: Pagination) -> Result<Vec<Post>, DataError> {
    let posts = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, title, content, slug, published, views, author_id, created_at, updated_at
        FROM posts
        WHERE published
        ORDER BY created_at DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(page.limit)
    .bind(page.offset)
    .fetch_all(pool)
    .await?;
    Ok(posts)
}

/// Keyset pagination over published posts. Ids are time-ordered, so walking
/// them descending with `id < cursor` yields strictly older pages with no
/// overlap.
pub async fn list_posts_after_cursor(
    pool: &PgPool,
    cursor: Option<Uuid>,
    limit: i64,
) -> Result<Vec<Post>, DataError> {
    let posts = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, title, content, slug, published, views, author_id, created_at, updated_at
        FROM posts
        WHERE published AND (id < $1 OR $1 IS NULL)
        ORDER BY id DESC
        LIMIT $2
        "#,
    )
    .bind(cursor)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(posts)
}

pub async fn list_posts_in_range(
    pool: &PgPool,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<Post>, DataError> {
    let posts = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, title, content, slug, published, views, author_id, created_at, updated_at
        FROM posts
        WHERE created_at BETWEEN $1 AND $2
        ORDER BY created_at
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;
    Ok(posts)
}

pub async fn list_posts_with_author(pool: &PgPool) -> Result<Vec<PostWithAuthor>, DataError> {
    let rows = sqlx::query_as::<_, PostWithAuthor>(
        r#"
        SELECT posts.id    AS post_id,
               posts.title AS title,
               posts.slug  AS slug,
               users.name  AS author_name,
               users.email AS author_email
        FROM posts
        JOIN users ON posts.author_id = users.id
        ORDER BY posts.id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn list_users_with_posts(pool: &PgPool) -> Result<Vec<UserPostRow>, DataError> {
    let rows = sqlx::query_as::<_, UserPostRow>(
        r#"
        SELECT users.id        AS user_id,
               users.name      AS user_name,
               posts.id        AS post_id,
               posts.title     AS post_title,
               posts.published AS published
        FROM users
        LEFT JOIN posts ON posts.author_id = users.id
        ORDER BY users.id, posts.id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn update_post(
    pool: &PgPool,
    id: Uuid,
    PostUpdate { title, content, slug }: PostUpdate,
) -> Result<Option<Post>, DataError> {
    let (set_clause, params) = QueryBuilder::new(", ")
        .add_param("title", title)
        .add_param("content", content)
        .add_param("slug", slug)
        .build();

    let query = if set_clause.is_empty() {
        format!("UPDATE posts SET updated_at = now() WHERE id = $1 RETURNING {POST_COLUMNS}")
    } else {
        format!(
            "UPDATE posts SET {set_clause}, updated_at = now() WHERE id = ${} RETURNING {POST_COLUMNS}",
            params.len() + 1
        )
    };

    let mut result = sqlx::query_as::<_, Post>(&query);
    for param in params {
        result = result.bind(param);
    }
    let post = result.bind(id).fetch_optional(pool).await?;
    Ok(post)
}

/// Atomic increment, no read-modify-write.
pub async fn increment_post_views(pool: &PgPool, id: Uuid) -> Result<Option<Post>, DataError> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        UPDATE posts SET views = views + 1
        WHERE id = $1
        RETURNING id, title, content, slug, published, views, author_id, created_at, updated_at
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(post)
}

/// Publishes every post in `ids` with a single statement.
pub async fn publish_posts(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<Post>, DataError> {
    let posts = sqlx::query_as::<_, Post>(
        r#"
        UPDATE posts SET published = true, updated_at = now()
        WHERE id = ANY($1)
        RETURNING id, title, content, slug, published, views, author_id, created_at, updated_at
        "#,
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;
    Ok(posts)
}

pub async fn delete_post(pool: &PgPool, id: Uuid) -> Result<Option<Post>, DataError> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        DELETE FROM posts WHERE id = $1
        RETURNING id, title, content, slug, published, views, author_id, created_at, updated_at
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(post)
}
