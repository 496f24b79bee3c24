//! Error types for the subject.

use crate::observer::ObserverError;
use thiserror::Error;

/// Main error type for subject operations.
#[derive(Debug, Error)]
pub enum SubjectError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Subject used after destroy")]
    UseAfterDestroy,

    #[error("Observer failed on topic {topic:?}: {source}")]
    Observer {
        topic: String,
        #[source]
        source: ObserverError,
    },
}

impl SubjectError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SubjectError::InvalidArgument(msg.into())
    }
}

/// Result type for subject operations.
pub type Result<T> = std::result::Result<T, SubjectError>;
