//! Lifecycle error types
//!
//! Only genuine failures are errors. Not-found, already-exists and no-op are
//! reported as [`Outcome`](crate::outcome::Outcome) values.

use georchestra_directory::error::DirectoryError;
use thiserror::Error;

use crate::outcome::MembershipAttempt;
use crate::settings::SettingsError;

/// Result alias for lifecycle operations.
pub type LifecycleResult<T> = Result<T, LifecycleError>;

/// Failure of a lifecycle operation.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// The current settings cannot be used.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// A directory call failed.
    #[error("directory failure: {0}")]
    Directory(#[from] DirectoryError),

    /// The membership pass completed but the entry itself could not be deleted.
    #[error("failed to delete {dn} after {} membership removal(s): {source}", membership_removals.len())]
    EntryDeletionFailed {
        dn: String,
        membership_removals: Vec<MembershipAttempt>,
        #[source]
        source: DirectoryError,
    },

    /// A search returned an entry lacking a required attribute.
    #[error("malformed entry {dn}: {message}")]
    MalformedEntry { dn: String, message: String },
}

impl LifecycleError {
    /// Underlying directory error, if any.
    pub fn directory_error(&self) -> Option<&DirectoryError> {
        match self {
            LifecycleError::Directory(e) => Some(e),
            LifecycleError::EntryDeletionFailed { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Get an error code for classification.
    pub fn error_code(&self) -> &'static str {
        match self {
            LifecycleError::Settings(_) => "INVALID_SETTINGS",
            LifecycleError::Directory(e) => e.error_code(),
            LifecycleError::EntryDeletionFailed { .. } => "ENTRY_DELETION_FAILED",
            LifecycleError::MalformedEntry { .. } => "MALFORMED_ENTRY",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_error_conversion() {
        let err: LifecycleError = DirectoryError::AuthenticationFailed.into();
        assert_eq!(err.error_code(), "AUTH_FAILED");
        assert!(err.directory_error().is_some());
    }

    #[test]
    fn test_entry_deletion_failed_display() {
        let err = LifecycleError::EntryDeletionFailed {
            dn: "uid=alice,ou=users,dc=georchestra,dc=org".to_string(),
            membership_removals: vec![
                MembershipAttempt::succeeded("cn=USER,ou=roles,dc=georchestra,dc=org"),
                MembershipAttempt::succeeded("cn=C2C,ou=orgs,dc=georchestra,dc=org"),
            ],
            source: DirectoryError::operation_failed_with_code("busy", 51),
        };
        let text = err.to_string();
        assert!(text.contains("uid=alice"));
        assert!(text.contains("2 membership removal(s)"));
        assert_eq!(err.error_code(), "ENTRY_DELETION_FAILED");
        assert!(err.directory_error().is_some_and(|e| e.is_transient()));
    }

    #[test]
    fn test_settings_error_is_transparent() {
        let err: LifecycleError = SettingsError::Invalid("search base is empty".into()).into();
        assert_eq!(err.to_string(), "invalid settings: search base is empty");
        assert!(err.directory_error().is_none());
    }
}
