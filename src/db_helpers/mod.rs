use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::DataError;
use crate::models::{Post, User};

mod comment_helpers;
mod event_helpers;
mod group_helpers;
mod post_helpers;
mod profile_helpers;
mod relation_helpers;
mod stats_helpers;
mod transaction_helpers;
mod user_helpers;

pub use comment_helpers::*;
pub use event_helpers::*;
pub use group_helpers::*;
pub use post_helpers::*;
pub use profile_helpers::*;
pub use relation_helpers::*;
pub use stats_helpers::*;
pub use transaction_helpers::*;
pub use user_helpers::*;

const MAX_PAGE_SIZE: i64 = 100;
const DEFAULT_PAGE_SIZE: i64 = 20;

#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl Pagination {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit: limit.clamp(1, MAX_PAGE_SIZE),
            offset: offset.max(0),
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

/// Builds the SET clause of a partial UPDATE, skipping absent fields so they
/// are never written at all.
struct QueryBuilder {
    query: String,
    params: Vec<String>,
    seperator: &'static str,
}

impl QueryBuilder {
    fn new(seperator: &'static str) -> Self {
        Self {
            query: String::new(),
            params: Vec::new(),
            seperator,
        }
    }

    fn add_param(mut self, column: &str, param: Option<String>) -> Self {
        if let Some(value) = param {
            if !self.params.is_empty() {
                self.query.push_str(self.seperator);
            }
            self.query.push_str(&format!("{} = ${}", column, self.params.len() + 1));
            self.params.push(value);
        }
        self
    }

    fn build(self) -> (String, Vec<String>) {
        (self.query, self.params)
    }
}

// ----------------- Shared lookups -----------------

pub async fn get_user_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, DataError> {
    let result = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, name, status, role, settings, deleted_at, created_at, updated_at
        FROM users WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(result)
}

pub async fn get_user_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, DataError> {
    let result = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, name, status, role, settings, deleted_at, created_at, updated_at
        FROM users WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(result)
}

pub async fn get_post_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Post>, DataError> {
    let result = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, title, content, slug, published, views, author_id, created_at, updated_at
        FROM posts WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(result)
}

pub async fn get_post_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Post>, DataError> {
    let result = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, title, content, slug, published, views, author_id, created_at, updated_at
        FROM posts WHERE slug = $1
        "#,
    )
    .bind(slug)
    .fetch_optional(pool)
    .await?;
    Ok(result)
}
