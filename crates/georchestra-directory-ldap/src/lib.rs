//! # LDAP Directory Capability
//!
//! LDAP v3 implementation of the `georchestra-directory` capability traits on
//! top of the `ldap3` client.
//!
//! ## Example
//!
//! ```ignore
//! use georchestra_directory::prelude::*;
//! use georchestra_directory_ldap::LdapDirectory;
//!
//! let params = ConnectionParams::new("ldap.example.org", 389)
//!     .with_bind("cn=admin,dc=georchestra,dc=org", "secret");
//!
//! let mut session = LdapDirectory::new().connect(&params).await?;
//! let entries = session
//!     .search("dc=georchestra,dc=org", Scope::Subtree, &Filter::eq("uid", "alice"), &["mail"])
//!     .await?;
//! session.unbind().await?;
//! ```

pub mod connector;
pub mod filter;
mod result;

pub use connector::{LdapDirectory, LdapSession};
pub use filter::{escape_filter_value, filter_to_ldap};
