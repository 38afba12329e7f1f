//! Typed operation outcomes
//!
//! Recoverable results of the existence and precondition checks. Directory
//! failures never end up here; they are [`LifecycleError`](crate::LifecycleError)s.

use georchestra_directory::error::DirectoryError;
use serde::Serialize;

/// Result of a lifecycle operation that completed without a directory failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome<T> {
    /// The operation ran and produced `T`.
    Applied { result: T },

    /// The user, role or organization looked up does not exist.
    NotFound,

    /// The entry to create already exists; nothing was written.
    AlreadyExists { dn: String },

    /// The transition precondition was not met; nothing was written.
    NoOp { dn: String },
}

impl<T> Outcome<T> {
    /// Wrap an applied result.
    pub fn applied(result: T) -> Self {
        Outcome::Applied { result }
    }

    /// Whether the operation ran.
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied { .. })
    }

    /// Applied result, if any.
    pub fn into_applied(self) -> Option<T> {
        match self {
            Outcome::Applied { result } => Some(result),
            _ => None,
        }
    }

    /// Borrow the applied result, if any.
    pub fn as_applied(&self) -> Option<&T> {
        match self {
            Outcome::Applied { result } => Some(result),
            _ => None,
        }
    }

    /// Transform the applied result.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Applied { result } => Outcome::Applied { result: f(result) },
            Outcome::NotFound => Outcome::NotFound,
            Outcome::AlreadyExists { dn } => Outcome::AlreadyExists { dn },
            Outcome::NoOp { dn } => Outcome::NoOp { dn },
        }
    }

    /// Short label for logs and CLI output.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Applied { .. } => "applied",
            Outcome::NotFound => "not_found",
            Outcome::AlreadyExists { .. } => "already_exists",
            Outcome::NoOp { .. } => "no_op",
        }
    }
}

/// One independent membership write of a multi-step operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MembershipAttempt {
    /// Group the write targeted (follow-ups, user deletion) or the member
    /// removed (role deletion).
    pub dn: String,

    /// Error message when the write failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Error code when the write failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<&'static str>,
}

impl MembershipAttempt {
    /// A write that went through (or had nothing left to do).
    pub fn succeeded(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            error: None,
            error_code: None,
        }
    }

    /// A write that failed.
    pub fn failed(dn: impl Into<String>, error: &DirectoryError) -> Self {
        Self {
            dn: dn.into(),
            error: Some(error.to_string()),
            error_code: Some(error.error_code()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// A user written under the pending subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedUser {
    pub dn: String,
    pub uid: String,

    /// Generated `georchestraObjectIdentifier`.
    pub identifier: String,

    /// Default role then default organization follow-ups, in that order.
    pub memberships: Vec<MembershipAttempt>,
}

impl CreatedUser {
    /// Whether a follow-up membership write failed.
    pub fn is_partial(&self) -> bool {
        self.memberships.iter().any(|m| !m.is_success())
    }
}

/// An entry deleted after its membership pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletedEntry {
    pub dn: String,

    /// One attempt per membership, in directory order.
    pub membership_removals: Vec<MembershipAttempt>,
}

impl DeletedEntry {
    /// Whether a membership removal failed before the entry was deleted.
    pub fn is_partial(&self) -> bool {
        self.membership_removals.iter().any(|m| !m.is_success())
    }
}
