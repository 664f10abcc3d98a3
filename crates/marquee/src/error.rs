use marquee_core::storage::RepositoryError;

/// Error returned across the service boundary.
///
/// Cache failures never appear here; the cache accessor swallows them.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Repository(RepositoryError),
}

impl ServiceError {
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        ServiceError::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity_type, id } => {
                ServiceError::NotFound { entity_type, id }
            }
            RepositoryError::AlreadyExists { entity_type, id } => {
                ServiceError::Conflict(format!("{entity_type} already exists: {id}"))
            }
            other => ServiceError::Repository(other),
        }
    }
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_passes_through() {
        let err: ServiceError = RepositoryError::not_found("Movie", 42).into();
        assert_eq!(err, ServiceError::not_found("Movie", 42));
        assert_eq!(err.to_string(), "Movie not found: 42");
    }

    #[test]
    fn test_already_exists_becomes_conflict() {
        let err: ServiceError = RepositoryError::already_exists("WatchlistEntry", "u/1").into();
        assert_eq!(
            err,
            ServiceError::Conflict("WatchlistEntry already exists: u/1".to_string())
        );
    }

    #[test]
    fn test_other_errors_are_wrapped() {
        let err: ServiceError = RepositoryError::QueryFailed("disk I/O error".to_string()).into();
        assert!(matches!(err, ServiceError::Repository(_)));
        assert_eq!(err.to_string(), "Query failed: disk I/O error");
    }
}
