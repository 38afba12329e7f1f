//! Directory capability traits
//!
//! A [`DirectoryConnector`] opens bound sessions; a [`DirectorySession`]
//! executes requests strictly one at a time (`&mut self`).

use async_trait::async_trait;

use crate::config::ConnectionParams;
use crate::error::DirectoryResult;
use crate::operation::{AttributeSet, Entry, Filter, Modification, Scope};

/// Owned, type-erased session as handed out by a connector.
pub type BoxedSession = Box<dyn DirectorySession>;

/// Opens bound directory sessions.
#[async_trait]
pub trait DirectoryConnector: Send + Sync {
    /// Display name for logs.
    fn display_name(&self) -> &str;

    /// Connect to the server described by `params` and bind with its credentials.
    async fn connect(&self, params: &ConnectionParams) -> DirectoryResult<BoxedSession>;
}

/// One bound session against the directory.
#[async_trait]
pub trait DirectorySession: Send {
    /// Search below `base_dn`.
    ///
    /// A base DN that does not exist yields an empty result rather than an
    /// error, so existence checks can be expressed as searches.
    async fn search(
        &mut self,
        base_dn: &str,
        scope: Scope,
        filter: &Filter,
        attributes: &[&str],
    ) -> DirectoryResult<Vec<Entry>>;

    /// Add an entry with the given object classes and attributes.
    async fn add(
        &mut self,
        dn: &str,
        object_classes: &[&str],
        attributes: AttributeSet,
    ) -> DirectoryResult<()>;

    /// Apply attribute changes to an entry, atomically for that entry.
    async fn modify(&mut self, dn: &str, changes: Vec<Modification>) -> DirectoryResult<()>;

    /// Delete a leaf entry.
    async fn delete(&mut self, dn: &str) -> DirectoryResult<()>;

    /// Rename and/or move an entry (modify DN), removing the old RDN value.
    async fn rename(&mut self, dn: &str, new_rdn: &str, new_superior: &str) -> DirectoryResult<()>;

    /// Close the session.
    async fn unbind(&mut self) -> DirectoryResult<()>;

    /// Search and keep the first entry.
    async fn search_first(
        &mut self,
        base_dn: &str,
        scope: Scope,
        filter: &Filter,
        attributes: &[&str],
    ) -> DirectoryResult<Option<Entry>> {
        let entries = self.search(base_dn, scope, filter, attributes).await?;
        Ok(entries.into_iter().next())
    }

    /// Whether the entry named `dn` exists: a base-scope search with `(objectClass=*)`.
    async fn entry_exists(&mut self, dn: &str) -> DirectoryResult<bool> {
        let entries = self.search(dn, Scope::Base, &Filter::any(), &["1.1"]).await?;
        Ok(!entries.is_empty())
    }
}
