#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),
    #[error("Failed to convert column '{column}' ({type_name}): {source}")]
    Conversion {
        column: String,
        type_name: String,
        #[source]
        source: sqlx::Error,
    },
}
