//! Entry codec
//!
//! DN construction from the configured templates, attribute sets for the
//! entries this crate writes, and typed records parsed from search results.

mod password;
mod records;

pub use password::hash_password;
pub use records::{role_cns_from_member_of, NewUser, RoleInfo, UserInfo};
pub(crate) use records::{org_attributes, role_attributes, user_attributes};

use georchestra_directory::dn::child_dn;
use georchestra_directory::operation::Filter;

use crate::settings::LdapSettings;

pub(crate) const USER_OBJECT_CLASSES: &[&str] = &[
    "georchestraUser",
    "organizationalPerson",
    "inetOrgPerson",
    "person",
    "shadowAccount",
    "top",
];
pub(crate) const ROLE_OBJECT_CLASSES: &[&str] = &["top", "groupOfMembers", "georchestraRole"];
pub(crate) const ORG_OBJECT_CLASSES: &[&str] = &["groupOfMembers", "top", "georchestraOrg"];

pub(crate) const MEMBER: &str = "member";
pub(crate) const MEMBER_OF: &str = "memberOf";
pub(crate) const DEFAULT_ROLE_DESCRIPTION: &str = "Role created via script";

/// `uid=<uid>,<pending users base>`
pub fn pending_user_dn(settings: &LdapSettings, uid: &str) -> String {
    child_dn("uid", uid, &settings.pending_users_base())
}

/// `uid=<uid>,<users base>`
pub fn active_user_dn(settings: &LdapSettings, uid: &str) -> String {
    child_dn("uid", uid, &settings.users_base())
}

/// `cn=<cn>,<roles base>`
pub fn role_dn(settings: &LdapSettings, cn: &str) -> String {
    child_dn("cn", cn, &settings.roles_base())
}

/// `cn=<cn>,<orgs base>`
pub fn org_dn(settings: &LdapSettings, cn: &str) -> String {
    child_dn("cn", cn, &settings.orgs_base())
}

pub(crate) fn mail_filter(settings: &LdapSettings, email: &str) -> Filter {
    Filter::eq(settings.mail_attribute.as_str(), email)
}

pub(crate) fn cn_filter(cn: &str) -> Filter {
    Filter::eq("cn", cn)
}
