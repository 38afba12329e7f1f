//! CLI error types and exit codes
//!
//! - 0: Applied or nothing to do
//! - 1: Failure, including a partially applied operation
//! - 2: Not found or already exists

use georchestra_directory::error::DirectoryError;
use georchestra_ldap::{LifecycleError, SettingsError};
use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Settings(#[from] SettingsError),

    #[error("{0}")]
    Lifecycle(LifecycleError),

    #[error("Failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

impl From<LifecycleError> for CliError {
    fn from(e: LifecycleError) -> Self {
        match e {
            LifecycleError::Settings(e) => CliError::Settings(e),
            other => CliError::Lifecycle(other),
        }
    }
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        1
    }

    /// Stable code printed next to the message.
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Settings(_) => "INVALID_SETTINGS",
            CliError::Lifecycle(e) => e.error_code(),
            CliError::Output(_) => "OUTPUT_ERROR",
        }
    }

    /// Print the error to stderr with appropriate formatting
    pub fn print(&self) {
        let use_color = std::env::var("NO_COLOR").is_err();

        if use_color {
            eprintln!("\x1b[31mError [{}]:\x1b[0m {}", self.code(), self);
        } else {
            eprintln!("Error [{}]: {}", self.code(), self);
        }

        if let Some(suggestion) = self.suggestion() {
            if use_color {
                eprintln!("\n\x1b[33mSuggestion:\x1b[0m {}", suggestion);
            } else {
                eprintln!("\nSuggestion: {}", suggestion);
            }
        }
    }

    fn suggestion(&self) -> Option<&'static str> {
        match self {
            CliError::Settings(_) => {
                Some("Check the LDAP_* environment variables (see --help).")
            }
            CliError::Lifecycle(e) => match e.directory_error()? {
                DirectoryError::ConnectionFailed { .. } => {
                    Some("Check LDAP_SERVER, LDAP_PORT and LDAP_USE_SSL.")
                }
                DirectoryError::AuthenticationFailed => {
                    Some("Check LDAP_USER_DN and LDAP_PASSWORD.")
                }
                DirectoryError::AuthorizationFailed { .. } => {
                    Some("The bind identity lacks write access to the geOrchestra tree.")
                }
                _ => None,
            },
            CliError::Output(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_errors_are_unwrapped() {
        let err = CliError::from(LifecycleError::Settings(SettingsError::Invalid(
            "search base must not be empty".to_string(),
        )));

        assert!(matches!(err, CliError::Settings(_)));
        assert_eq!(err.code(), "INVALID_SETTINGS");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_connection_failure_has_a_suggestion() {
        let err = CliError::from(LifecycleError::Directory(DirectoryError::connection_failed(
            "connection refused",
        )));

        assert_eq!(
            err.suggestion(),
            Some("Check LDAP_SERVER, LDAP_PORT and LDAP_USE_SSL.")
        );
    }

    #[test]
    fn test_authentication_failure_has_a_suggestion() {
        let err = CliError::from(LifecycleError::Directory(
            DirectoryError::AuthenticationFailed,
        ));

        assert_eq!(err.suggestion(), Some("Check LDAP_USER_DN and LDAP_PASSWORD."));
        assert_eq!(err.exit_code(), 1);
    }
}
