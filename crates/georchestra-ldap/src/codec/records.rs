//! Attribute sets written by the lifecycle operations and records read back.

use serde::Serialize;

use georchestra_directory::dn::{is_descendant_of, leading_rdn_value};
use georchestra_directory::operation::{AttributeSet, Entry};

use super::{DEFAULT_ROLE_DESCRIPTION, MEMBER, MEMBER_OF};
use crate::settings::LdapSettings;

/// Registration data for a new user.
#[derive(Clone)]
pub struct NewUser {
    pub uid: String,
    pub email: String,
    pub given_name: String,
    pub surname: String,
    pub password: String,
}

impl NewUser {
    pub fn new(
        uid: impl Into<String>,
        email: impl Into<String>,
        given_name: impl Into<String>,
        surname: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            uid: uid.into(),
            email: email.into(),
            given_name: given_name.into(),
            surname: surname.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("uid", &self.uid)
            .field("email", &self.email)
            .field("given_name", &self.given_name)
            .field("surname", &self.surname)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

pub(crate) fn user_attributes(
    settings: &LdapSettings,
    user: &NewUser,
    identifier: &str,
    password_hash: &str,
) -> AttributeSet {
    AttributeSet::new()
        .with("uid", user.uid.as_str())
        .with(settings.mail_attribute.as_str(), user.email.as_str())
        .with("cn", user.uid.as_str())
        .with("sn", user.surname.as_str())
        .with("givenName", user.given_name.as_str())
        .with("description", "USER")
        .with("knowledgeInformation", format!("Auto-created ({})", user.uid))
        .with("georchestraObjectIdentifier", identifier)
        .with("userPassword", password_hash)
}

pub(crate) fn role_attributes(
    cn: &str,
    description: Option<&str>,
    identifier: &str,
    members: &[String],
) -> AttributeSet {
    let mut attrs = AttributeSet::new()
        .with("cn", cn)
        .with("description", description.unwrap_or(DEFAULT_ROLE_DESCRIPTION))
        .with("georchestraObjectIdentifier", identifier);
    if !members.is_empty() {
        attrs.set_values(MEMBER, members.iter().cloned());
    }
    attrs
}

pub(crate) fn org_attributes(cn: &str, name: Option<&str>) -> AttributeSet {
    AttributeSet::new()
        .with("cn", cn)
        .with("o", name.unwrap_or(cn))
}

/// User record as returned by the read operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserInfo {
    pub dn: String,
    pub uid: Option<String>,
    pub cn: Option<String>,
    pub mail: Option<String>,

    /// Group DNs the user belongs to (roles and organizations).
    pub member_of: Vec<String>,
}

impl UserInfo {
    /// Attributes to request for [`UserInfo::from_entry`].
    pub(crate) fn attributes(mail_attribute: &str) -> [&str; 4] {
        ["cn", "uid", mail_attribute, MEMBER_OF]
    }

    pub fn from_entry(entry: &Entry, mail_attribute: &str) -> Self {
        Self {
            dn: entry.dn.clone(),
            uid: entry.first("uid").map(str::to_string),
            cn: entry.first("cn").map(str::to_string),
            mail: entry.first(mail_attribute).map(str::to_string),
            member_of: entry.values(MEMBER_OF).to_vec(),
        }
    }
}

/// Role record as returned by role lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleInfo {
    pub dn: String,
    pub cn: Option<String>,
    pub description: Option<String>,
    pub members: Vec<String>,
}

impl RoleInfo {
    pub(crate) const ATTRIBUTES: [&'static str; 3] = ["cn", "description", MEMBER];

    pub fn from_entry(entry: &Entry) -> Self {
        Self {
            dn: entry.dn.clone(),
            cn: entry.first("cn").map(str::to_string),
            description: entry.first("description").map(str::to_string),
            members: entry.values(MEMBER).to_vec(),
        }
    }
}

/// Role names from a `memberOf` list: groups below `roles_base`, by leading RDN value.
pub fn role_cns_from_member_of(member_of: &[String], roles_base: &str) -> Vec<String> {
    member_of
        .iter()
        .filter(|dn| is_descendant_of(dn, roles_base))
        .filter_map(|dn| leading_rdn_value(dn))
        .collect()
}
