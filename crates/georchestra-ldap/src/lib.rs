//! # geOrchestra LDAP
//!
//! Identity lifecycle coordinator for a geOrchestra directory: user
//! registration under the pending subtree, moderation, role and organization
//! membership, deletion with referential cleanup, and reads.
//!
//! ## Crate Organization
//!
//! - [`settings`] - Endpoint, credentials and DN templates
//! - [`codec`] - DN builders, entry attribute sets, typed records, `{SSHA}` hashing
//! - [`operations`] - One function per lifecycle use case over a directory session
//! - [`client`] - [`GeorchestraLdapClient`], the facade opening one session per call
//! - [`outcome`] - Not-found / already-exists / no-op outcomes and membership attempts
//! - [`error`] - Lifecycle failures
//!
//! Operations are idempotent with respect to their existence checks but not
//! atomic: a multi-step operation reports each sub-step it attempted instead
//! of rolling back.

pub mod client;
pub mod codec;
pub mod error;
pub mod operations;
pub mod outcome;
pub mod settings;

pub use client::GeorchestraLdapClient;
pub use codec::{hash_password, NewUser, RoleInfo, UserInfo};
pub use error::{LifecycleError, LifecycleResult};
pub use outcome::{CreatedUser, DeletedEntry, MembershipAttempt, Outcome};
pub use settings::{LdapSettings, SettingsError};
