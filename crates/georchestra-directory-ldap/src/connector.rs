//! LDAP connector and session
//!
//! [`LdapDirectory`] binds a fresh `ldap3` connection per [`connect`] call;
//! [`LdapSession`] runs the capability requests on it.
//!
//! [`connect`]: georchestra_directory::traits::DirectoryConnector::connect

use std::collections::HashSet;

use async_trait::async_trait;
use ldap3::{Ldap, LdapConnAsync, LdapConnSettings, Mod, SearchEntry, SearchResult};
use tracing::{debug, info, instrument, warn};

use georchestra_directory::config::ConnectionParams;
use georchestra_directory::error::{DirectoryError, DirectoryResult};
use georchestra_directory::operation::{
    AttributeSet, Entry, Filter, Modification, ModificationOp, Scope,
};
use georchestra_directory::traits::{BoxedSession, DirectoryConnector, DirectorySession};

use crate::filter::filter_to_ldap;
use crate::result::{check_result, NO_SUCH_OBJECT};

/// Connector opening bound LDAP v3 sessions.
#[derive(Debug, Clone, Default)]
pub struct LdapDirectory {
    display_name: String,
}

impl LdapDirectory {
    /// Create a new connector.
    pub fn new() -> Self {
        Self {
            display_name: "LDAP".to_string(),
        }
    }

    /// Create a connector with a custom display name for logs.
    pub fn with_display_name(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
        }
    }

    /// Open a connection and bind, returning the concrete session type.
    #[instrument(skip(self, params), fields(url = %params.url(), bind_dn = %params.bind_dn))]
    pub async fn open(&self, params: &ConnectionParams) -> DirectoryResult<LdapSession> {
        params.validate()?;
        let url = params.url();

        debug!("Connecting to LDAP server");

        let settings = LdapConnSettings::new().set_conn_timeout(params.connection_timeout());

        let (conn, mut ldap) = LdapConnAsync::with_settings(settings, &url)
            .await
            .map_err(|e| {
                DirectoryError::connection_failed_with_source(
                    format!("Failed to connect to LDAP server at {}", url),
                    e,
                )
            })?;

        // Spawn the connection driver
        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                warn!(error = %e, "LDAP connection driver error");
            }
        });

        let bind_password = params.bind_password.as_deref().unwrap_or("");

        debug!("Performing LDAP bind");

        let result = ldap
            .simple_bind(&params.bind_dn, bind_password)
            .await
            .map_err(|e| {
                DirectoryError::connection_failed_with_source(
                    format!("LDAP bind failed for {}", params.bind_dn),
                    e,
                )
            })?;

        check_result(result.rc, &result.text, "bind", &params.bind_dn, None).map_err(
            |e| match e {
                DirectoryError::AuthenticationFailed => e,
                other => DirectoryError::connection_failed(other.to_string()),
            },
        )?;

        info!("LDAP session bound");

        Ok(LdapSession { ldap, url })
    }
}

#[async_trait]
impl DirectoryConnector for LdapDirectory {
    fn display_name(&self) -> &str {
        &self.display_name
    }

    async fn connect(&self, params: &ConnectionParams) -> DirectoryResult<BoxedSession> {
        let session = self.open(params).await?;
        Ok(Box::new(session))
    }
}

/// One bound LDAP connection.
pub struct LdapSession {
    ldap: Ldap,
    url: String,
}

impl std::fmt::Debug for LdapSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LdapSession")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl LdapSession {
    /// URL of the server this session is bound to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

fn to_ldap_scope(scope: Scope) -> ldap3::Scope {
    match scope {
        Scope::Base => ldap3::Scope::Base,
        Scope::OneLevel => ldap3::Scope::OneLevel,
        Scope::Subtree => ldap3::Scope::Subtree,
    }
}

fn to_entry(entry: SearchEntry) -> Entry {
    let mut attributes = AttributeSet::new();
    for (name, values) in entry.attrs {
        attributes.set_values(name, values);
    }
    // Binary values are not used by the managed entries; keep them as lossy text.
    for (name, values) in entry.bin_attrs {
        attributes.set_values(
            name,
            values
                .iter()
                .map(|v| String::from_utf8_lossy(v).into_owned()),
        );
    }
    Entry::new(entry.dn, attributes)
}

fn to_ldap_mod(change: Modification) -> Mod<String> {
    let values: HashSet<String> = change.values.into_iter().collect();
    match change.op {
        ModificationOp::Add => Mod::Add(change.attribute, values),
        ModificationOp::Delete => Mod::Delete(change.attribute, values),
        ModificationOp::Replace => Mod::Replace(change.attribute, values),
    }
}

/// Attribute named by every change of a request, if they all touch the same one.
fn single_attribute(changes: &[Modification]) -> Option<String> {
    let first = changes.first()?;
    changes
        .iter()
        .all(|c| c.attribute.eq_ignore_ascii_case(&first.attribute))
        .then(|| first.attribute.clone())
}

fn add_request(object_classes: &[&str], attributes: AttributeSet) -> Vec<(String, HashSet<String>)> {
    let mut request: Vec<(String, HashSet<String>)> = Vec::with_capacity(attributes.len() + 1);
    request.push((
        "objectClass".to_string(),
        object_classes.iter().map(|c| c.to_string()).collect(),
    ));
    for (name, values) in attributes.iter() {
        if name.eq_ignore_ascii_case("objectClass") || values.is_empty() {
            continue;
        }
        request.push((name.clone(), values.iter().cloned().collect()));
    }
    request
}

#[async_trait]
impl DirectorySession for LdapSession {
    #[instrument(skip(self, filter, attributes), fields(filter = %filter_to_ldap(filter)))]
    async fn search(
        &mut self,
        base_dn: &str,
        scope: Scope,
        filter: &Filter,
        attributes: &[&str],
    ) -> DirectoryResult<Vec<Entry>> {
        let ldap_filter = filter_to_ldap(filter);

        let SearchResult(entries, result) = self
            .ldap
            .search(base_dn, to_ldap_scope(scope), &ldap_filter, attributes.to_vec())
            .await
            .map_err(|e| {
                DirectoryError::operation_failed_with_source(
                    format!("Failed to search under {}", base_dn),
                    e,
                )
            })?;

        if result.rc == NO_SUCH_OBJECT {
            debug!("Search base does not exist");
            return Ok(Vec::new());
        }
        check_result(result.rc, &result.text, "search", base_dn, None)?;

        let entries: Vec<Entry> = entries
            .into_iter()
            .map(SearchEntry::construct)
            .map(to_entry)
            .collect();

        debug!(count = entries.len(), "Search completed");

        Ok(entries)
    }

    #[instrument(skip(self, object_classes, attributes))]
    async fn add(
        &mut self,
        dn: &str,
        object_classes: &[&str],
        attributes: AttributeSet,
    ) -> DirectoryResult<()> {
        let request = add_request(object_classes, attributes);

        let result = self.ldap.add(dn, request).await.map_err(|e| {
            DirectoryError::operation_failed_with_source(format!("Failed to add entry: {}", dn), e)
        })?;
        check_result(result.rc, &result.text, "add", dn, None)?;

        info!("LDAP entry added");
        Ok(())
    }

    #[instrument(skip(self, changes))]
    async fn modify(&mut self, dn: &str, changes: Vec<Modification>) -> DirectoryResult<()> {
        if changes.is_empty() {
            return Ok(());
        }

        let attribute = single_attribute(&changes);
        let mods: Vec<Mod<String>> = changes.into_iter().map(to_ldap_mod).collect();

        let result = self.ldap.modify(dn, mods).await.map_err(|e| {
            DirectoryError::operation_failed_with_source(
                format!("Failed to modify entry: {}", dn),
                e,
            )
        })?;
        check_result(result.rc, &result.text, "modify", dn, attribute.as_deref())?;

        debug!("LDAP entry modified");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&mut self, dn: &str) -> DirectoryResult<()> {
        let result = self.ldap.delete(dn).await.map_err(|e| {
            DirectoryError::operation_failed_with_source(
                format!("Failed to delete entry: {}", dn),
                e,
            )
        })?;
        check_result(result.rc, &result.text, "delete", dn, None)?;

        info!("LDAP entry deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn rename(&mut self, dn: &str, new_rdn: &str, new_superior: &str) -> DirectoryResult<()> {
        let result = self
            .ldap
            .modifydn(dn, new_rdn, true, Some(new_superior))
            .await
            .map_err(|e| {
                DirectoryError::operation_failed_with_source(
                    format!("Failed to rename entry: {}", dn),
                    e,
                )
            })?;
        check_result(result.rc, &result.text, "modify DN", dn, None)?;

        info!("LDAP entry renamed");
        Ok(())
    }

    #[instrument(skip(self), fields(url = %self.url))]
    async fn unbind(&mut self) -> DirectoryResult<()> {
        self.ldap.unbind().await.map_err(|e| {
            DirectoryError::connection_failed_with_source("LDAP unbind failed", e)
        })?;
        debug!("LDAP session closed");
        Ok(())
    }
}
