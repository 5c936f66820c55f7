use thiserror::Error;

use crate::actor_framework::FrameworkError;

/// Failures of the create, update and delete procedures.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OperationError {
    #[error("Data not found")]
    NotFound,
    /// Storage rejected the write; the message is the storage layer's own.
    #[error("{0}")]
    PersistenceFailure(String),
    #[error("Dependent cleanup failed: {0}")]
    DependentCleanupFailure(String),
}

impl From<FrameworkError> for OperationError {
    fn from(error: FrameworkError) -> Self {
        match error {
            FrameworkError::NotFound(_) => OperationError::NotFound,
            FrameworkError::Rejected(reason) => OperationError::PersistenceFailure(reason),
            other => OperationError::PersistenceFailure(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framework_errors_map_onto_operation_errors() {
        assert_eq!(
            OperationError::from(FrameworkError::NotFound("9".into())),
            OperationError::NotFound
        );
        assert_eq!(
            OperationError::from(FrameworkError::Rejected("price must not be negative".into())),
            OperationError::PersistenceFailure("price must not be negative".into())
        );
        assert_eq!(
            OperationError::from(FrameworkError::ActorDropped),
            OperationError::PersistenceFailure("Actor dropped".into())
        );
    }
}
