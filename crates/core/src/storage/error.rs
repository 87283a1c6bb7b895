use thiserror::Error;

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Schema provisioning failed: {0}")]
    ProvisionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_not_found_display() {
        let error = RepositoryError::NotFound {
            entity_type: "Book",
            id: "abc-123".to_string(),
        };
        assert_eq!(error.to_string(), "Book not found: abc-123");
    }

    #[test]
    fn test_repository_error_already_exists_display() {
        let error = RepositoryError::AlreadyExists {
            entity_type: "User",
            id: "alice@example.com".to_string(),
        };
        assert_eq!(error.to_string(), "User already exists: alice@example.com");
    }

    #[test]
    fn test_repository_error_connection_failed_display() {
        let error = RepositoryError::ConnectionFailed("timeout after 2s".to_string());
        assert_eq!(error.to_string(), "Connection failed: timeout after 2s");
    }

    #[test]
    fn test_repository_error_provision_failed_display() {
        let error = RepositoryError::ProvisionFailed("create table denied".to_string());
        assert_eq!(
            error.to_string(),
            "Schema provisioning failed: create table denied"
        );
    }

    #[test]
    fn test_repository_error_query_failed_display() {
        let error = RepositoryError::QueryFailed("invalid partition key".to_string());
        assert_eq!(error.to_string(), "Query failed: invalid partition key");
    }

    #[test]
    fn test_repository_error_invalid_data_display() {
        let error = RepositoryError::InvalidData("missing field: email".to_string());
        assert_eq!(error.to_string(), "Invalid data: missing field: email");
    }
}
