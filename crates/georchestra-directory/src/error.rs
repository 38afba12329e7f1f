//! Directory error types
//!
//! Error definitions with transient/permanent classification. Protocol
//! implementations translate their native result codes into these variants so
//! the lifecycle layer can branch on meaning rather than on numbers.

use thiserror::Error;

/// Result alias used throughout the directory capability.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Error that can occur during a directory session call.
#[derive(Debug, Error)]
pub enum DirectoryError {
    // Connection errors (usually transient)
    /// Failed to establish or keep the connection to the directory server.
    #[error("connection failed: {message}")]
    ConnectionFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Authentication errors (permanent)
    /// The bind credentials were rejected.
    #[error("authentication failed: invalid credentials")]
    AuthenticationFailed,

    /// The bound identity is not allowed to perform the operation.
    #[error("authorization failed: insufficient access for {operation}")]
    AuthorizationFailed { operation: String },

    // Configuration errors (permanent)
    /// Connection parameters are invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    // Entry errors
    /// An entry with this DN already exists (add conflict).
    #[error("object already exists: {identifier}")]
    ObjectAlreadyExists { identifier: String },

    /// The target entry does not exist.
    #[error("object not found: {identifier}")]
    ObjectNotFound { identifier: String },

    /// The attribute value being added is already present on the entry.
    #[error("value already present in '{attribute}' of {dn}")]
    ValueAlreadyPresent { dn: String, attribute: String },

    /// The attribute value being deleted is not present on the entry.
    #[error("no such value in '{attribute}' of {dn}")]
    NoSuchValue { dn: String, attribute: String },

    /// Schema or server constraint rejected the change.
    #[error("constraint violation: {message}")]
    ConstraintViolation { message: String },

    /// Data returned by or sent to the directory is malformed.
    #[error("invalid data: {message}")]
    InvalidData { message: String },

    /// Any other failed operation, with the protocol result code when known.
    #[error("operation failed: {message}")]
    OperationFailed {
        message: String,
        code: Option<u32>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl DirectoryError {
    /// Check if this error is transient and the call could be retried by the caller.
    ///
    /// Nothing in this workspace retries; the classification is exposed for
    /// callers that wrap the client with their own retry policy.
    pub fn is_transient(&self) -> bool {
        matches!(self, DirectoryError::ConnectionFailed { .. })
            || matches!(
                self,
                DirectoryError::OperationFailed {
                    code: Some(51..=53),
                    ..
                }
            )
    }

    /// Check if this error is permanent and retry won't help.
    pub fn is_permanent(&self) -> bool {
        !self.is_transient()
    }

    /// Get an error code for classification.
    pub fn error_code(&self) -> &'static str {
        match self {
            DirectoryError::ConnectionFailed { .. } => "CONNECTION_FAILED",
            DirectoryError::AuthenticationFailed => "AUTH_FAILED",
            DirectoryError::AuthorizationFailed { .. } => "AUTHORIZATION_FAILED",
            DirectoryError::InvalidConfiguration { .. } => "INVALID_CONFIG",
            DirectoryError::ObjectAlreadyExists { .. } => "OBJECT_EXISTS",
            DirectoryError::ObjectNotFound { .. } => "OBJECT_NOT_FOUND",
            DirectoryError::ValueAlreadyPresent { .. } => "VALUE_EXISTS",
            DirectoryError::NoSuchValue { .. } => "NO_SUCH_VALUE",
            DirectoryError::ConstraintViolation { .. } => "CONSTRAINT_VIOLATION",
            DirectoryError::InvalidData { .. } => "INVALID_DATA",
            DirectoryError::OperationFailed { .. } => "OPERATION_FAILED",
        }
    }

    // Convenience constructors

    /// Create a connection failed error.
    pub fn connection_failed(message: impl Into<String>) -> Self {
        DirectoryError::ConnectionFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Create a connection failed error with source.
    pub fn connection_failed_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        DirectoryError::ConnectionFailed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an operation failed error.
    pub fn operation_failed(message: impl Into<String>) -> Self {
        DirectoryError::OperationFailed {
            message: message.into(),
            code: None,
            source: None,
        }
    }

    /// Create an operation failed error carrying a protocol result code.
    pub fn operation_failed_with_code(message: impl Into<String>, code: u32) -> Self {
        DirectoryError::OperationFailed {
            message: message.into(),
            code: Some(code),
            source: None,
        }
    }

    /// Create an operation failed error with source.
    pub fn operation_failed_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        DirectoryError::OperationFailed {
            message: message.into(),
            code: None,
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid data error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        DirectoryError::InvalidData {
            message: message.into(),
        }
    }
}
