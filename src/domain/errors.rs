use thiserror::Error;

/// Failure taxonomy shared by the stores and the use cases.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Malformed input: bad action, empty id, unparseable URL, missing config.
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Duplicate alias (or duplicate identifier) inside a store.
    #[error("conflict: {0}")]
    Conflict(String),

    /// I/O or serialization failure in a file-backed store.
    #[error("storage failure: {0}")]
    Storage(String),

    /// Hub or resolver failure.
    #[error("upstream failure: {0}")]
    Upstream(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("operation deadline exceeded")]
    DeadlineExceeded,
}

impl CatalogError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(error: std::io::Error) -> Self {
        Self::Storage(error.to_string())
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(error: serde_json::Error) -> Self {
        Self::Storage(format!("json: {error}"))
    }
}
