use thiserror::Error;

/// Application-wide error types for jamscrape.
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP request failed (non-success status, malformed response).
    #[error("HTTP error: {0}")]
    Http(String),

    /// Network/connection error.
    #[error("Network error: {0}")]
    Network(String),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// A resource (jam, game, feed) could not be resolved.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A page was fetched but a required field could not be extracted.
    #[error("Parse error: {0}")]
    Parse(String),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A permanent capability gap, not an attempted-and-failed operation.
    /// Callers must be able to tell the two apart.
    #[error("Unsupported capability: {0}")]
    Unsupported(String),

    /// Generic error.
    #[error("{0}")]
    Generic(String),
}

impl AppError {
    /// Returns true for the permanent "not attempted" outcome of a
    /// capability the system deliberately does not provide.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, AppError::Unsupported(_))
    }

    /// Returns true if the error came from the network layer rather than
    /// from extraction or persistence.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            AppError::Http(_) | AppError::Network(_) | AppError::Timeout(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_is_distinguishable() {
        assert!(AppError::Unsupported("auth downloads".into()).is_unsupported());
        assert!(!AppError::Http("500".into()).is_unsupported());
        assert!(!AppError::NotFound("jam".into()).is_unsupported());
    }

    #[test]
    fn transport_errors_classified() {
        assert!(AppError::Network("reset".into()).is_transport());
        assert!(AppError::Timeout(30).is_transport());
        assert!(AppError::Http("503".into()).is_transport());
        assert!(!AppError::Parse("missing title".into()).is_transport());
        assert!(!AppError::Unsupported("x".into()).is_transport());
    }
}
