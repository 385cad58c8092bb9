use std::path::PathBuf;

use thiserror::Error;

/// Result type for schema operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors. Individual statement failures are not represented here; they
/// are reported and counted while the run continues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("DATABASE_URL environment variable not set")]
    MissingDatabaseUrl,

    #[error("SQL file not found: {}", .0.display())]
    SchemaNotFound(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    ReadSchema {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("Transaction error: {0}")]
    Transaction(#[source] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
