use thiserror::Error;

/// Errors surfaced by the index lifecycle operations.
///
/// Every variant is terminal for the current operation; nothing in this crate
/// retries.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Error connecting to database: {0}")]
    Connection(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Index does not exist: {0}")]
    NotFound(String),

    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The index exists on the server but reading it back failed.
    #[error("Index {id:?} was created but could not be read back: {source}")]
    Created {
        id: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// True when the index is definitively absent (as opposed to unreachable).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// True when the input was rejected before anything was sent to the server.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// Identity of an index that was created before the operation failed.
    pub fn created_id(&self) -> Option<&str> {
        match self {
            Error::Created { id, .. } => Some(id),
            _ => None,
        }
    }
}

/// Convenience Result type using our Error
pub type Result<T> = std::result::Result<T, Error>;
