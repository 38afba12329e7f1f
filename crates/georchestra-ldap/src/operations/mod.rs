//! Lifecycle operations
//!
//! One function per identity-management use case. Each takes a bound session
//! and the settings in force for the call, and issues its directory requests
//! strictly one after the other. Nothing is rolled back: a multi-step
//! operation reports every sub-step it attempted.

mod membership;
mod orgs;
mod roles;
mod users;

pub use membership::{add_user_role, remove_user_role, update_user_org};
pub use orgs::create_org;
pub use roles::{create_role, delete_role, get_role_info, role_exists};
pub use users::{
    create_user, delete_user, find_user_dn, moderate_user, read_user_info, read_user_roles,
    update_lastname,
};

use georchestra_directory::error::{DirectoryError, DirectoryResult};
use georchestra_directory::operation::{Entry, Modification, Scope};
use georchestra_directory::traits::DirectorySession;
use tracing::debug;

use crate::codec::{mail_filter, MEMBER};
use crate::outcome::MembershipAttempt;
use crate::settings::LdapSettings;

/// Attribute list requesting no attribute at all (RFC 4511).
pub(crate) const NO_ATTRIBUTES: &[&str] = &["1.1"];

/// First entry below the search base whose mail attribute equals `email`.
pub(crate) async fn find_user_entry(
    session: &mut dyn DirectorySession,
    settings: &LdapSettings,
    email: &str,
    attributes: &[&str],
) -> DirectoryResult<Option<Entry>> {
    let entry = session
        .search_first(
            &settings.search_base,
            Scope::Subtree,
            &mail_filter(settings, email),
            attributes,
        )
        .await?;
    debug!(found = entry.is_some(), "User lookup by mail");
    Ok(entry)
}

/// Add `member_dn` to the member attribute of `group_dn`.
///
/// Returns `false` when the member was already present.
pub(crate) async fn add_member(
    session: &mut dyn DirectorySession,
    group_dn: &str,
    member_dn: &str,
) -> DirectoryResult<bool> {
    match session
        .modify(group_dn, vec![Modification::add(MEMBER, [member_dn])])
        .await
    {
        Ok(()) => Ok(true),
        Err(DirectoryError::ValueAlreadyPresent { .. }) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Remove `member_dn` from the member attribute of `group_dn`.
///
/// Returns `false` when the member was not present.
pub(crate) async fn remove_member(
    session: &mut dyn DirectorySession,
    group_dn: &str,
    member_dn: &str,
) -> DirectoryResult<bool> {
    match session
        .modify(group_dn, vec![Modification::delete(MEMBER, [member_dn])])
        .await
    {
        Ok(()) => Ok(true),
        Err(DirectoryError::NoSuchValue { .. }) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Turn a membership write result into an attempt record.
fn attempt(dn: &str, result: DirectoryResult<bool>) -> MembershipAttempt {
    match result {
        Ok(_) => MembershipAttempt::succeeded(dn),
        Err(e) => MembershipAttempt::failed(dn, &e),
    }
}
