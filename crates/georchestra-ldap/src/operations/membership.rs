//! Role and organization membership changes.
//!
//! Membership has set semantics: adding a present member or removing an
//! absent one is reported as [`Outcome::NoOp`] with the group DN.

use georchestra_directory::operation::Scope;
use georchestra_directory::traits::DirectorySession;
use tracing::{debug, info, instrument};

use super::{add_member, find_user_entry, remove_member, NO_ATTRIBUTES};
use crate::codec::{cn_filter, org_dn, role_dn};
use crate::error::LifecycleResult;
use crate::outcome::Outcome;
use crate::settings::LdapSettings;

/// Add `user_dn` to the members of role `role_cn`. Returns the role DN.
///
/// The role is not looked up first: a missing role is a directory error.
#[instrument(skip(session, settings))]
pub async fn add_user_role(
    session: &mut dyn DirectorySession,
    settings: &LdapSettings,
    user_dn: &str,
    role_cn: &str,
) -> LifecycleResult<Outcome<String>> {
    let dn = role_dn(settings, role_cn);
    let added = add_member(session, &dn, user_dn).await?;
    Ok(membership_outcome(dn, added))
}

/// Remove the user with this mail from role `role_cn`. Returns the role DN.
///
/// The user and then the role are looked up before the removal; either one
/// missing gives [`Outcome::NotFound`] without any write.
#[instrument(skip(session, settings))]
pub async fn remove_user_role(
    session: &mut dyn DirectorySession,
    settings: &LdapSettings,
    email: &str,
    role_cn: &str,
) -> LifecycleResult<Outcome<String>> {
    let Some(user) = find_user_entry(session, settings, email, NO_ATTRIBUTES).await? else {
        debug!("User not found");
        return Ok(Outcome::NotFound);
    };

    let Some(role) = session
        .search_first(
            &settings.roles_base(),
            Scope::OneLevel,
            &cn_filter(role_cn),
            NO_ATTRIBUTES,
        )
        .await?
    else {
        debug!("Role not found");
        return Ok(Outcome::NotFound);
    };

    let removed = remove_member(session, &role.dn, &user.dn).await?;
    Ok(membership_outcome(role.dn, removed))
}

/// Add `user_dn` to the members of organization `org_cn`. Returns the org DN.
///
/// No existence check: a missing organization is a directory error.
#[instrument(skip(session, settings))]
pub async fn update_user_org(
    session: &mut dyn DirectorySession,
    settings: &LdapSettings,
    user_dn: &str,
    org_cn: &str,
) -> LifecycleResult<Outcome<String>> {
    let dn = org_dn(settings, org_cn);
    let added = add_member(session, &dn, user_dn).await?;
    Ok(membership_outcome(dn, added))
}

fn membership_outcome(group_dn: String, changed: bool) -> Outcome<String> {
    if changed {
        info!(group = %group_dn, "Membership updated");
        Outcome::applied(group_dn)
    } else {
        debug!(group = %group_dn, "Membership already in the requested state");
        Outcome::NoOp { dn: group_dn }
    }
}
