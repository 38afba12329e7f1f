//! Organization entries under the orgs base.

use georchestra_directory::operation::Scope;
use georchestra_directory::traits::DirectorySession;
use tracing::{debug, info, instrument};

use super::NO_ATTRIBUTES;
use crate::codec::{cn_filter, org_attributes, org_dn, ORG_OBJECT_CLASSES};
use crate::error::LifecycleResult;
use crate::outcome::Outcome;
use crate::settings::LdapSettings;

/// Create an organization unless one with this cn already exists.
///
/// `name` becomes the `o` attribute and defaults to the cn.
#[instrument(skip(session, settings))]
pub async fn create_org(
    session: &mut dyn DirectorySession,
    settings: &LdapSettings,
    cn: &str,
    name: Option<&str>,
) -> LifecycleResult<Outcome<String>> {
    if let Some(existing) = session
        .search_first(&settings.orgs_base(), Scope::OneLevel, &cn_filter(cn), NO_ATTRIBUTES)
        .await?
    {
        debug!(dn = %existing.dn, "Organization already exists");
        return Ok(Outcome::AlreadyExists { dn: existing.dn });
    }

    let dn = org_dn(settings, cn);
    session
        .add(&dn, ORG_OBJECT_CLASSES, org_attributes(cn, name))
        .await?;

    info!(dn = %dn, "Organization created");
    Ok(Outcome::applied(dn))
}
