//! In-memory directory for lifecycle tests.
//!
//! Behaves like an OpenLDAP server with the memberof and refint overlays as far
//! as the lifecycle operations can observe: `memberOf` is derived from group
//! `member` values, a rename rewrites references to the old DN, and a delete
//! leaves dangling references in place. Every request is recorded and failures
//! can be injected per request kind and DN.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use georchestra_directory::config::ConnectionParams;
use georchestra_directory::dn::{is_descendant_of, normalize_dn, same_dn, split_leading_rdn};
use georchestra_directory::error::{DirectoryError, DirectoryResult};
use georchestra_directory::operation::{
    AttributeSet, Entry, Filter, Modification, ModificationOp, Scope,
};
use georchestra_directory::traits::{BoxedSession, DirectoryConnector, DirectorySession};
use georchestra_ldap::codec::{org_dn, pending_user_dn, role_dn};
use georchestra_ldap::{GeorchestraLdapClient, LdapSettings};

// =============================================================================
// Recorded requests and failure injection
// =============================================================================

/// A request received by a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Search { base: String, scope: Scope },
    Add { dn: String },
    Modify { dn: String, changes: Vec<Modification> },
    Delete { dn: String },
    Rename { dn: String, new_rdn: String, new_superior: String },
}

impl Call {
    pub fn is_write(&self) -> bool {
        !matches!(self, Call::Search { .. })
    }
}

/// Request kinds that can be made to fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailOn {
    Connect,
    Search,
    Add(String),
    Modify(String),
    Delete(String),
    Rename(String),
}

fn injected() -> DirectoryError {
    DirectoryError::operation_failed_with_code("injected failure", 80)
}

#[derive(Debug, Clone)]
struct StoredEntry {
    dn: String,
    object_classes: Vec<String>,
    attributes: AttributeSet,
}

#[derive(Default)]
struct DirectoryState {
    entries: BTreeMap<String, StoredEntry>,
    calls: Vec<Call>,
    failures: Vec<FailOn>,
    connections: Vec<ConnectionParams>,
}

impl DirectoryState {
    fn should_fail(&self, rule: &FailOn) -> bool {
        self.failures.iter().any(|f| match (f, rule) {
            (FailOn::Add(a), FailOn::Add(b))
            | (FailOn::Modify(a), FailOn::Modify(b))
            | (FailOn::Delete(a), FailOn::Delete(b))
            | (FailOn::Rename(a), FailOn::Rename(b)) => same_dn(a, b),
            (a, b) => a == b,
        })
    }

    fn get(&self, dn: &str) -> Option<&StoredEntry> {
        self.entries.get(&normalize_dn(dn))
    }

    fn parent_exists(&self, dn: &str) -> bool {
        match split_leading_rdn(dn).1 {
            Some(parent) => self.get(parent).is_some(),
            None => true,
        }
    }

    fn member_of(&self, dn: &str) -> Vec<String> {
        self.entries
            .values()
            .filter(|group| {
                group
                    .attributes
                    .get("member")
                    .is_some_and(|members| members.iter().any(|m| same_dn(m, dn)))
            })
            .map(|group| group.dn.clone())
            .collect()
    }

    fn matches(&self, entry: &StoredEntry, filter: &Filter) -> bool {
        match filter {
            Filter::Equals { attribute, value } => {
                if attribute.eq_ignore_ascii_case("objectClass") {
                    entry
                        .object_classes
                        .iter()
                        .any(|c| c.eq_ignore_ascii_case(value))
                } else {
                    entry
                        .attributes
                        .get(attribute)
                        .is_some_and(|values| values.iter().any(|v| v.eq_ignore_ascii_case(value)))
                }
            }
            Filter::Present { attribute } => {
                attribute.eq_ignore_ascii_case("objectClass") || entry.attributes.has(attribute)
            }
            Filter::And { filters } => filters.iter().all(|f| self.matches(entry, f)),
            Filter::Or { filters } => filters.iter().any(|f| self.matches(entry, f)),
            Filter::Not { filter } => !self.matches(entry, filter),
        }
    }

    fn in_scope(entry: &StoredEntry, base: &str, scope: Scope) -> bool {
        match scope {
            Scope::Base => same_dn(&entry.dn, base),
            Scope::OneLevel => split_leading_rdn(&entry.dn)
                .1
                .is_some_and(|parent| same_dn(parent, base)),
            Scope::Subtree => same_dn(&entry.dn, base) || is_descendant_of(&entry.dn, base),
        }
    }

    fn project(&self, entry: &StoredEntry, requested: &[&str]) -> Entry {
        let mut attributes = AttributeSet::new();
        if requested == ["1.1"] {
            return Entry::new(entry.dn.clone(), attributes);
        }

        let all = requested.is_empty() || requested.contains(&"*");
        for (name, values) in entry.attributes.iter() {
            if all || requested.iter().any(|r| r.eq_ignore_ascii_case(name)) {
                attributes.set_values(name.clone(), values.iter().cloned());
            }
        }
        if requested.iter().any(|r| r.eq_ignore_ascii_case("memberOf")) {
            let groups = self.member_of(&entry.dn);
            if !groups.is_empty() {
                attributes.set_values("memberOf", groups);
            }
        }
        Entry::new(entry.dn.clone(), attributes)
    }
}

// =============================================================================
// Connector
// =============================================================================

/// Shared in-memory tree; clones see the same state.
#[derive(Clone, Default)]
pub struct InMemoryDirectory {
    state: Arc<Mutex<DirectoryState>>,
    unbinds: Arc<AtomicUsize>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tree with the four containers, the default role and the default organization.
    pub fn seeded(settings: &LdapSettings) -> Self {
        let directory = Self::new();
        directory.insert(&settings.search_base, &["top", "dcObject"], AttributeSet::new());
        for container in [
            settings.users_base(),
            settings.pending_users_base(),
            settings.roles_base(),
            settings.orgs_base(),
        ] {
            directory.insert(&container, &["top", "organizationalUnit"], AttributeSet::new());
        }
        directory.insert_role(settings, &settings.default_role_cn);
        directory.insert(
            &org_dn(settings, &settings.default_org_cn),
            &["groupOfMembers", "top", "georchestraOrg"],
            AttributeSet::new().with("cn", settings.default_org_cn.as_str()),
        );
        directory
    }

    pub fn with_failure(self, rule: FailOn) -> Self {
        self.fail(rule);
        self
    }

    pub fn fail(&self, rule: FailOn) {
        self.state.lock().unwrap().failures.push(rule);
    }

    pub fn clear_failures(&self) {
        self.state.lock().unwrap().failures.clear();
    }

    /// Insert an entry directly, bypassing the call log.
    pub fn insert(&self, dn: &str, object_classes: &[&str], attributes: AttributeSet) {
        let entry = StoredEntry {
            dn: dn.to_string(),
            object_classes: object_classes.iter().map(|c| c.to_string()).collect(),
            attributes,
        };
        self.state
            .lock()
            .unwrap()
            .entries
            .insert(normalize_dn(dn), entry);
    }

    pub fn insert_role(&self, settings: &LdapSettings, cn: &str) -> String {
        let dn = role_dn(settings, cn);
        self.insert(
            &dn,
            &["top", "groupOfMembers", "georchestraRole"],
            AttributeSet::new().with("cn", cn),
        );
        dn
    }

    /// Insert a user under the pending subtree.
    pub fn insert_pending_user(&self, settings: &LdapSettings, uid: &str, mail: &str) -> String {
        let dn = pending_user_dn(settings, uid);
        self.insert_user_at(settings, &dn, uid, mail);
        dn
    }

    pub fn insert_user_at(&self, settings: &LdapSettings, dn: &str, uid: &str, mail: &str) {
        self.insert(
            dn,
            &["georchestraUser", "inetOrgPerson", "person", "top"],
            AttributeSet::new()
                .with("uid", uid)
                .with("cn", uid)
                .with("sn", uid)
                .with(settings.mail_attribute.as_str(), mail),
        );
    }

    /// Add a member value directly, bypassing the call log.
    pub fn add_member(&self, group_dn: &str, member_dn: &str) {
        let mut state = self.state.lock().unwrap();
        let group = state
            .entries
            .get_mut(&normalize_dn(group_dn))
            .expect("group exists");
        match group.attributes.get_mut("member") {
            Some(values) => values.push(member_dn.to_string()),
            None => group.attributes.set("member", member_dn),
        }
    }

    pub fn exists(&self, dn: &str) -> bool {
        self.state.lock().unwrap().get(dn).is_some()
    }

    pub fn attributes(&self, dn: &str) -> Option<AttributeSet> {
        self.state
            .lock()
            .unwrap()
            .get(dn)
            .map(|e| e.attributes.clone())
    }

    pub fn object_classes(&self, dn: &str) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .get(dn)
            .map(|e| e.object_classes.clone())
            .unwrap_or_default()
    }

    pub fn members(&self, group_dn: &str) -> Vec<String> {
        self.attributes(group_dn)
            .and_then(|a| a.get("member").map(<[String]>::to_vec))
            .unwrap_or_default()
    }

    pub fn entry_count(&self) -> usize {
        self.state.lock().unwrap().entries.len()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn writes(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_write).collect()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn connections(&self) -> Vec<ConnectionParams> {
        self.state.lock().unwrap().connections.clone()
    }

    pub fn unbinds(&self) -> usize {
        self.unbinds.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DirectoryConnector for InMemoryDirectory {
    fn display_name(&self) -> &str {
        "in-memory"
    }

    async fn connect(&self, params: &ConnectionParams) -> DirectoryResult<BoxedSession> {
        let mut state = self.state.lock().unwrap();
        if state.should_fail(&FailOn::Connect) {
            return Err(DirectoryError::connection_failed("injected connect failure"));
        }
        state.connections.push(params.clone());
        Ok(Box::new(InMemorySession {
            state: Arc::clone(&self.state),
            unbinds: Arc::clone(&self.unbinds),
        }))
    }
}

// =============================================================================
// Session
// =============================================================================

pub struct InMemorySession {
    state: Arc<Mutex<DirectoryState>>,
    unbinds: Arc<AtomicUsize>,
}

fn apply_change(dn: &str, attributes: &mut AttributeSet, change: &Modification) -> DirectoryResult<()> {
    let present = |values: &[String], v: &str| {
        values
            .iter()
            .any(|existing| existing.eq_ignore_ascii_case(v) || same_dn(existing, v))
    };

    match change.op {
        ModificationOp::Add => {
            let mut values = attributes
                .get(&change.attribute)
                .map(<[String]>::to_vec)
                .unwrap_or_default();
            for value in &change.values {
                if present(&values, value) {
                    return Err(DirectoryError::ValueAlreadyPresent {
                        dn: dn.to_string(),
                        attribute: change.attribute.clone(),
                    });
                }
                values.push(value.clone());
            }
            attributes.set_values(change.attribute.clone(), values);
        }
        ModificationOp::Delete => {
            let Some(values) = attributes.get(&change.attribute).map(<[String]>::to_vec) else {
                return Err(DirectoryError::NoSuchValue {
                    dn: dn.to_string(),
                    attribute: change.attribute.clone(),
                });
            };
            if change.values.is_empty() {
                attributes.remove(&change.attribute);
                return Ok(());
            }
            if change.values.iter().any(|v| !present(&values, v)) {
                return Err(DirectoryError::NoSuchValue {
                    dn: dn.to_string(),
                    attribute: change.attribute.clone(),
                });
            }
            let remaining: Vec<String> = values
                .into_iter()
                .filter(|existing| !present(&change.values, existing))
                .collect();
            if remaining.is_empty() {
                attributes.remove(&change.attribute);
            } else {
                attributes.set_values(change.attribute.clone(), remaining);
            }
        }
        ModificationOp::Replace => {
            if change.values.is_empty() {
                attributes.remove(&change.attribute);
            } else {
                attributes.set_values(change.attribute.clone(), change.values.clone());
            }
        }
    }
    Ok(())
}

#[async_trait]
impl DirectorySession for InMemorySession {
    async fn search(
        &mut self,
        base_dn: &str,
        scope: Scope,
        filter: &Filter,
        attributes: &[&str],
    ) -> DirectoryResult<Vec<Entry>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Search {
            base: base_dn.to_string(),
            scope,
        });
        if state.should_fail(&FailOn::Search) {
            return Err(injected());
        }

        Ok(state
            .entries
            .values()
            .filter(|e| DirectoryState::in_scope(e, base_dn, scope))
            .filter(|e| state.matches(e, filter))
            .map(|e| state.project(e, attributes))
            .collect())
    }

    async fn add(
        &mut self,
        dn: &str,
        object_classes: &[&str],
        attributes: AttributeSet,
    ) -> DirectoryResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Add { dn: dn.to_string() });
        if state.should_fail(&FailOn::Add(dn.to_string())) {
            return Err(injected());
        }
        if state.get(dn).is_some() {
            return Err(DirectoryError::ObjectAlreadyExists {
                identifier: dn.to_string(),
            });
        }
        if !state.parent_exists(dn) {
            return Err(DirectoryError::ObjectNotFound {
                identifier: dn.to_string(),
            });
        }

        state.entries.insert(
            normalize_dn(dn),
            StoredEntry {
                dn: dn.to_string(),
                object_classes: object_classes.iter().map(|c| c.to_string()).collect(),
                attributes,
            },
        );
        Ok(())
    }

    async fn modify(&mut self, dn: &str, changes: Vec<Modification>) -> DirectoryResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Modify {
            dn: dn.to_string(),
            changes: changes.clone(),
        });
        if state.should_fail(&FailOn::Modify(dn.to_string())) {
            return Err(injected());
        }

        let key = normalize_dn(dn);
        let Some(entry) = state.entries.get(&key) else {
            return Err(DirectoryError::ObjectNotFound {
                identifier: dn.to_string(),
            });
        };

        let mut updated = entry.attributes.clone();
        for change in &changes {
            apply_change(dn, &mut updated, change)?;
        }
        if let Some(entry) = state.entries.get_mut(&key) {
            entry.attributes = updated;
        }
        Ok(())
    }

    async fn delete(&mut self, dn: &str) -> DirectoryResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Delete { dn: dn.to_string() });
        if state.should_fail(&FailOn::Delete(dn.to_string())) {
            return Err(injected());
        }
        if state.get(dn).is_none() {
            return Err(DirectoryError::ObjectNotFound {
                identifier: dn.to_string(),
            });
        }
        if state.entries.values().any(|e| is_descendant_of(&e.dn, dn)) {
            return Err(DirectoryError::operation_failed_with_code(
                "subordinate objects must be deleted first",
                66,
            ));
        }

        state.entries.remove(&normalize_dn(dn));
        Ok(())
    }

    async fn rename(&mut self, dn: &str, new_rdn: &str, new_superior: &str) -> DirectoryResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Rename {
            dn: dn.to_string(),
            new_rdn: new_rdn.to_string(),
            new_superior: new_superior.to_string(),
        });
        if state.should_fail(&FailOn::Rename(dn.to_string())) {
            return Err(injected());
        }

        let new_dn = format!("{new_rdn},{new_superior}");
        if state.get(&new_dn).is_some() {
            return Err(DirectoryError::ObjectAlreadyExists { identifier: new_dn });
        }
        if state.get(new_superior).is_none() {
            return Err(DirectoryError::ObjectNotFound {
                identifier: new_superior.to_string(),
            });
        }
        let Some(mut entry) = state.entries.remove(&normalize_dn(dn)) else {
            return Err(DirectoryError::ObjectNotFound {
                identifier: dn.to_string(),
            });
        };

        entry.dn = new_dn.clone();
        state.entries.insert(normalize_dn(&new_dn), entry);

        // refint: rewrite references to the old DN.
        for group in state.entries.values_mut() {
            if let Some(members) = group.attributes.get_mut("member") {
                for member in members.iter_mut() {
                    if same_dn(member, dn) {
                        *member = new_dn.clone();
                    }
                }
            }
        }
        Ok(())
    }

    async fn unbind(&mut self) -> DirectoryResult<()> {
        self.unbinds.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// =============================================================================
// Fixtures
// =============================================================================

pub fn test_settings() -> LdapSettings {
    LdapSettings::default()
}

/// Client over a seeded in-memory directory.
pub fn seeded_client() -> (GeorchestraLdapClient, InMemoryDirectory) {
    let settings = test_settings();
    let directory = InMemoryDirectory::seeded(&settings);
    let client = GeorchestraLdapClient::with_connector(settings, Arc::new(directory.clone()))
        .expect("default settings are valid");
    (client, directory)
}

/// Client over an existing in-memory directory.
pub fn client_for(directory: &InMemoryDirectory) -> GeorchestraLdapClient {
    GeorchestraLdapClient::with_connector(test_settings(), Arc::new(directory.clone()))
        .expect("default settings are valid")
}
