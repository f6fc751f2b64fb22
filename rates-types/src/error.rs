//! Error types for the currency rates service.
//!
//! Errors are typed from the point of failure to the HTTP boundary; the
//! HTTP mapping is a pure function of the variant (see the inbound adapter),
//! never a match on message text.

/// Repository-level errors (data access failures).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),

    /// A single-row statement touched an unexpected number of rows.
    /// With primary-key updates this should be unreachable, but it is
    /// reported rather than ignored.
    #[error("unexpected row count, total affected: {affected}")]
    Anomaly { affected: u64 },
}

/// Application-level errors (for HTTP responses).
///
/// Each variant corresponds to one entry of the response error catalog.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Duplicate entry: {0}")]
    Conflict(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("{0} cannot be null")]
    NullParam(String),

    #[error("File type not supported")]
    UnsupportedMediaType,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Not Found".into()),
            RepoError::Conflict(msg) => AppError::Conflict(msg),
            RepoError::Database(msg) => AppError::Internal(msg),
            RepoError::Anomaly { affected } => {
                AppError::Internal(format!("unexpected row count, total affected: {affected}"))
            }
        }
    }
}
