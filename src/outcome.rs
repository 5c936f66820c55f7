use serde::Serialize;

use crate::error::OperationError;

/// Message carried by every not-found failure, whatever the entity type.
pub const NOT_FOUND_MESSAGE: &str = "Data not found";

/// Message used when a failure is built from a blank message.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Request failed";

/// Response status the web boundary maps an outcome onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    Ok,
    NotFound,
    BadRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailureKind {
    NotFound,
    Rejected,
}

/// Uniform result wrapper returned by every catalog and cart operation.
///
/// Fields are private: an envelope is either a success with optional data or
/// a failure that always carries a message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome<T> {
    success: bool,
    data: Option<T>,
    error_message: Option<String>,
    #[serde(skip)]
    failure: Option<FailureKind>,
}

impl<T> Outcome<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error_message: None,
            failure: None,
        }
    }

    pub fn success_empty() -> Self {
        Self {
            success: true,
            data: None,
            error_message: None,
            failure: None,
        }
    }

    /// A blank `message` is replaced by [`DEFAULT_FAILURE_MESSAGE`].
    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            DEFAULT_FAILURE_MESSAGE.to_string()
        } else {
            message
        };
        Self {
            success: false,
            data: None,
            error_message: Some(message),
            failure: Some(FailureKind::Rejected),
        }
    }

    pub fn not_found() -> Self {
        Self {
            success: false,
            data: None,
            error_message: Some(NOT_FOUND_MESSAGE.to_string()),
            failure: Some(FailureKind::NotFound),
        }
    }

    pub fn from_result(result: Result<T, OperationError>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(e) => e.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn is_not_found(&self) -> bool {
        self.failure == Some(FailureKind::NotFound)
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn status(&self) -> ResponseStatus {
        match self.failure {
            None => ResponseStatus::Ok,
            Some(FailureKind::NotFound) => ResponseStatus::NotFound,
            Some(FailureKind::Rejected) => ResponseStatus::BadRequest,
        }
    }
}

impl<T> From<OperationError> for Outcome<T> {
    fn from(error: OperationError) -> Self {
        match error {
            OperationError::NotFound => Self::not_found(),
            other => Self::failure(other.to_string()),
        }
    }
}
