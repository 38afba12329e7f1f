//! User lifecycle: registration, moderation, deletion and reads.

use georchestra_directory::dn::{is_descendant_of, leading_rdn_value, rdn};
use georchestra_directory::operation::{Filter, Modification, Scope};
use georchestra_directory::traits::DirectorySession;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{add_member, attempt, find_user_entry, remove_member, NO_ATTRIBUTES};
use crate::codec::{
    active_user_dn, hash_password, org_dn, pending_user_dn, role_cns_from_member_of, role_dn,
    user_attributes, NewUser, UserInfo, MEMBER_OF, USER_OBJECT_CLASSES,
};
use crate::error::{LifecycleError, LifecycleResult};
use crate::outcome::{CreatedUser, DeletedEntry, MembershipAttempt, Outcome};
use crate::settings::LdapSettings;

/// Register a user under the pending subtree and attach the default role and
/// organization.
///
/// Any entry below the search base with the same uid or mail blocks the
/// registration. The two membership follow-ups are attempted independently
/// after the entry is written; their failures are reported in
/// [`CreatedUser::memberships`] and never undo the registration.
#[instrument(skip(session, settings, user), fields(uid = %user.uid))]
pub async fn create_user(
    session: &mut dyn DirectorySession,
    settings: &LdapSettings,
    user: &NewUser,
) -> LifecycleResult<Outcome<CreatedUser>> {
    let duplicate = Filter::or(vec![
        Filter::eq("uid", user.uid.as_str()),
        Filter::eq(settings.mail_attribute.as_str(), user.email.as_str()),
    ]);
    if let Some(existing) = session
        .search_first(&settings.search_base, Scope::Subtree, &duplicate, NO_ATTRIBUTES)
        .await?
    {
        debug!(dn = %existing.dn, "User already exists");
        return Ok(Outcome::AlreadyExists { dn: existing.dn });
    }

    let dn = pending_user_dn(settings, &user.uid);
    let identifier = Uuid::new_v4().to_string();
    let attributes = user_attributes(settings, user, &identifier, &hash_password(&user.password));

    session.add(&dn, USER_OBJECT_CLASSES, attributes).await?;
    info!(dn = %dn, "Pending user created");

    let mut memberships = Vec::with_capacity(2);
    for group_dn in [
        role_dn(settings, &settings.default_role_cn),
        org_dn(settings, &settings.default_org_cn),
    ] {
        let result = add_member(session, &group_dn, &dn).await;
        if let Err(e) = &result {
            warn!(group = %group_dn, error = %e, "Default membership not attached");
        }
        memberships.push(attempt(&group_dn, result));
    }

    Ok(Outcome::applied(CreatedUser {
        dn,
        uid: user.uid.clone(),
        identifier,
        memberships,
    }))
}

/// Move a pending user to the active users subtree.
///
/// Returns the new DN, or [`Outcome::NoOp`] with the current DN when the user
/// is not pending.
#[instrument(skip(session, settings))]
pub async fn moderate_user(
    session: &mut dyn DirectorySession,
    settings: &LdapSettings,
    email: &str,
) -> LifecycleResult<Outcome<String>> {
    let Some(entry) = find_user_entry(session, settings, email, &["uid"]).await? else {
        return Ok(Outcome::NotFound);
    };

    if !is_descendant_of(&entry.dn, &settings.pending_users_base()) {
        debug!(dn = %entry.dn, "User is not pending");
        return Ok(Outcome::NoOp { dn: entry.dn });
    }

    let uid = entry
        .first("uid")
        .map(str::to_string)
        .or_else(|| leading_rdn_value(&entry.dn))
        .ok_or_else(|| LifecycleError::MalformedEntry {
            dn: entry.dn.clone(),
            message: "no uid".to_string(),
        })?;

    session
        .rename(&entry.dn, &rdn("uid", &uid), &settings.users_base())
        .await?;

    let new_dn = active_user_dn(settings, &uid);
    info!(from = %entry.dn, to = %new_dn, "User moderated");
    Ok(Outcome::applied(new_dn))
}

/// Strip every group membership of a user, then delete its entry.
///
/// Each membership removal is attempted once, in `memberOf` order, whatever
/// the outcome of the previous ones. A failure of the final delete is
/// reported as [`LifecycleError::EntryDeletionFailed`].
#[instrument(skip(session, settings))]
pub async fn delete_user(
    session: &mut dyn DirectorySession,
    settings: &LdapSettings,
    email: &str,
) -> LifecycleResult<Outcome<DeletedEntry>> {
    let Some(entry) = find_user_entry(session, settings, email, &["uid", MEMBER_OF]).await? else {
        return Ok(Outcome::NotFound);
    };
    let dn = entry.dn.clone();

    let mut membership_removals: Vec<MembershipAttempt> = Vec::new();
    for group_dn in entry.values(MEMBER_OF) {
        let result = remove_member(session, group_dn, &dn).await;
        if let Err(e) = &result {
            warn!(group = %group_dn, error = %e, "Membership removal failed, continuing");
        }
        membership_removals.push(attempt(group_dn, result));
    }

    if let Err(source) = session.delete(&dn).await {
        return Err(LifecycleError::EntryDeletionFailed {
            dn,
            membership_removals,
            source,
        });
    }

    info!(dn = %dn, removals = membership_removals.len(), "User deleted");
    Ok(Outcome::applied(DeletedEntry {
        dn,
        membership_removals,
    }))
}

/// Replace the surname of the entry named `user_dn`. Returns the DN.
#[instrument(skip(session))]
pub async fn update_lastname(
    session: &mut dyn DirectorySession,
    user_dn: &str,
    surname: &str,
) -> LifecycleResult<String> {
    session
        .modify(user_dn, vec![Modification::replace("sn", [surname])])
        .await?;
    info!("Surname updated");
    Ok(user_dn.to_string())
}

/// DN, uid, cn, mail and `memberOf` of the user with this mail.
#[instrument(skip(session, settings))]
pub async fn read_user_info(
    session: &mut dyn DirectorySession,
    settings: &LdapSettings,
    email: &str,
) -> LifecycleResult<Outcome<UserInfo>> {
    let attributes = UserInfo::attributes(&settings.mail_attribute);
    let entry = find_user_entry(session, settings, email, &attributes).await?;
    Ok(match entry {
        Some(entry) => Outcome::applied(UserInfo::from_entry(&entry, &settings.mail_attribute)),
        None => Outcome::NotFound,
    })
}

/// Names of the roles the user with this mail belongs to.
#[instrument(skip(session, settings))]
pub async fn read_user_roles(
    session: &mut dyn DirectorySession,
    settings: &LdapSettings,
    email: &str,
) -> LifecycleResult<Outcome<Vec<String>>> {
    let entry = find_user_entry(session, settings, email, &[MEMBER_OF]).await?;
    Ok(match entry {
        Some(entry) => Outcome::applied(role_cns_from_member_of(
            entry.values(MEMBER_OF),
            &settings.roles_base(),
        )),
        None => Outcome::NotFound,
    })
}

/// DN of the user with this mail.
#[instrument(skip(session, settings))]
pub async fn find_user_dn(
    session: &mut dyn DirectorySession,
    settings: &LdapSettings,
    email: &str,
) -> LifecycleResult<Outcome<String>> {
    let entry = find_user_entry(session, settings, email, NO_ATTRIBUTES).await?;
    Ok(match entry {
        Some(entry) => Outcome::applied(entry.dn),
        None => Outcome::NotFound,
    })
}

