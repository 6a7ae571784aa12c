use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    /// A composite operation needed a parent row that does not exist.
    /// Plain single-row lookups return `Ok(None)` instead.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Anything the store reports (unique/foreign-key/not-null violations
    /// included) is forwarded as-is.
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
