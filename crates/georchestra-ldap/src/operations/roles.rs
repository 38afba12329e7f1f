//! Role entries under the roles base.

use georchestra_directory::operation::Scope;
use georchestra_directory::traits::DirectorySession;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{attempt, remove_member, NO_ATTRIBUTES};
use crate::codec::{cn_filter, role_attributes, role_dn, RoleInfo, MEMBER, ROLE_OBJECT_CLASSES};
use crate::error::{LifecycleError, LifecycleResult};
use crate::outcome::{DeletedEntry, MembershipAttempt, Outcome};
use crate::settings::LdapSettings;

/// Create a role unless one with this cn already exists.
///
/// Returns the role DN; [`Outcome::AlreadyExists`] carries the DN of the
/// existing role.
#[instrument(skip(session, settings, members))]
pub async fn create_role(
    session: &mut dyn DirectorySession,
    settings: &LdapSettings,
    cn: &str,
    description: Option<&str>,
    members: &[String],
) -> LifecycleResult<Outcome<String>> {
    let base = settings.roles_base();
    if let Some(existing) = session
        .search_first(&base, Scope::OneLevel, &cn_filter(cn), NO_ATTRIBUTES)
        .await?
    {
        debug!(dn = %existing.dn, "Role already exists");
        return Ok(Outcome::AlreadyExists { dn: existing.dn });
    }

    let dn = role_dn(settings, cn);
    let identifier = Uuid::new_v4().to_string();
    session
        .add(
            &dn,
            ROLE_OBJECT_CLASSES,
            role_attributes(cn, description, &identifier, members),
        )
        .await?;

    info!(dn = %dn, members = members.len(), "Role created");
    Ok(Outcome::applied(dn))
}

/// Empty a role member by member, then delete it.
///
/// Every member removal is attempted; the role entry is deleted after the
/// pass whatever the individual results.
#[instrument(skip(session, settings))]
pub async fn delete_role(
    session: &mut dyn DirectorySession,
    settings: &LdapSettings,
    cn: &str,
) -> LifecycleResult<Outcome<DeletedEntry>> {
    let Some(entry) = session
        .search_first(&settings.roles_base(), Scope::OneLevel, &cn_filter(cn), &[MEMBER])
        .await?
    else {
        return Ok(Outcome::NotFound);
    };
    let dn = entry.dn.clone();

    let mut membership_removals: Vec<MembershipAttempt> = Vec::new();
    for member_dn in entry.values(MEMBER) {
        let result = remove_member(session, &dn, member_dn).await;
        if let Err(e) = &result {
            warn!(member = %member_dn, error = %e, "Member removal failed, continuing");
        }
        membership_removals.push(attempt(member_dn, result));
    }

    if let Err(source) = session.delete(&dn).await {
        return Err(LifecycleError::EntryDeletionFailed {
            dn,
            membership_removals,
            source,
        });
    }

    info!(dn = %dn, removals = membership_removals.len(), "Role deleted");
    Ok(Outcome::applied(DeletedEntry {
        dn,
        membership_removals,
    }))
}

/// Whether the role entry `cn=<cn>,<roles base>` exists.
#[instrument(skip(session, settings))]
pub async fn role_exists(
    session: &mut dyn DirectorySession,
    settings: &LdapSettings,
    cn: &str,
) -> LifecycleResult<bool> {
    Ok(session.entry_exists(&role_dn(settings, cn)).await?)
}

/// DN, cn, description and members of a role.
#[instrument(skip(session, settings))]
pub async fn get_role_info(
    session: &mut dyn DirectorySession,
    settings: &LdapSettings,
    cn: &str,
) -> LifecycleResult<Outcome<RoleInfo>> {
    let entry = session
        .search_first(
            &settings.roles_base(),
            Scope::OneLevel,
            &cn_filter(cn),
            &RoleInfo::ATTRIBUTES,
        )
        .await?;
    Ok(match entry {
        Some(entry) => Outcome::applied(RoleInfo::from_entry(&entry)),
        None => Outcome::NotFound,
    })
}
