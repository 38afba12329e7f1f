//! # Directory Capability
//!
//! Protocol-neutral abstractions over an LDAP-style directory, consumed by the
//! geOrchestra identity lifecycle operations.
//!
//! The capability is split in two traits:
//!
//! - [`DirectoryConnector`] - opens and binds a session from [`ConnectionParams`]
//! - [`DirectorySession`] - search, add, modify, delete and rename on one bound session
//!
//! Implementations live in separate crates (`georchestra-directory-ldap` for a
//! real server); tests provide in-memory ones.
//!
//! ## Crate Organization
//!
//! - [`config`] - Connection parameters
//! - [`error`] - Error taxonomy with transient/permanent classification
//! - [`operation`] - Entries, attribute sets, filters, scopes and modifications
//! - [`dn`] - Distinguished name helpers (RFC 4514 escaping, RDN parsing)
//! - [`traits`] - Capability traits

pub mod config;
pub mod dn;
pub mod error;
pub mod operation;
pub mod traits;

/// Prelude module for convenient imports.
///
/// ```
/// use georchestra_directory::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::ConnectionParams;
    pub use crate::error::{DirectoryError, DirectoryResult};
    pub use crate::operation::{AttributeSet, Entry, Filter, Modification, ModificationOp, Scope};
    pub use crate::traits::{BoxedSession, DirectoryConnector, DirectorySession};
}

// Re-export async_trait for capability implementors
pub use async_trait::async_trait;
