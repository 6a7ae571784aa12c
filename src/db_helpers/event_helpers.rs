use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::DataError;
use crate::models::Event;

pub async fn record_event(pool: &PgPool, data: &serde_json::Value) -> Result<Event, DataError> {
    let event = sqlx::query_as::<_, Event>(
        r#"
        INSERT INTO events (id, data)
        VALUES ($1, $2)
        RETURNING id, data, created_at
        "#,
    )
    .bind(Uuid::now_v7())
    .bind(data)
    .fetch_one(pool)
    .await?;
    Ok(event)
}

/// Events whose payload structurally contains `filter` (JSONB `@>`, served by
/// the GIN index).
pub async fn list_events_containing(
    pool: &PgPool,
    filter: &serde_json::Value,
) -> Result<Vec<Event>, DataError> {
    let events = sqlx::query_as::<_, Event>(
        r#"
        SELECT id, data, created_at
        FROM events
        WHERE data @> $1
        ORDER BY id DESC
        "#,
    )
    .bind(filter)
    .fetch_all(pool)
    .await?;
    Ok(events)
}

pub async fn list_events_of_type(pool: &PgPool, kind: &str) -> Result<Vec<Event>, DataError> {
    let events = sqlx::query_as::<_, Event>(
        r#"
        SELECT id, data, created_at
        FROM events
        WHERE data->>'type' = $1
        ORDER BY id DESC
        "#,
    )
    .bind(kind)
    .fetch_all(pool)
    .await?;
    Ok(events)
}
