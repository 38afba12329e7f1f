//! Membership commands

use clap::Args;
use georchestra_ldap::GeorchestraLdapClient;

use crate::error::CliResult;
use crate::output::{self, Status};

/// Arguments for the add-user-role command
#[derive(Args)]
pub struct AddUserRoleArgs {
    /// DN of the user entry
    pub user_dn: String,

    /// Role common name
    pub role: String,
}

/// Arguments for the remove-user-role command
#[derive(Args)]
pub struct RemoveUserRoleArgs {
    /// User e-mail address
    pub email: String,

    /// Role common name
    pub role: String,
}

/// Arguments for the update-user-org command
#[derive(Args)]
pub struct UpdateUserOrgArgs {
    /// DN of the user entry
    pub user_dn: String,

    /// Organization common name
    pub org: String,
}

pub async fn add_role(
    client: &GeorchestraLdapClient,
    args: AddUserRoleArgs,
    json: bool,
) -> CliResult<Status> {
    let outcome = client.add_user_role(&args.user_dn, &args.role).await?;

    output::report(&outcome, json, |role_dn| {
        output::print_success(&format!("{} added to {role_dn}", args.user_dn));
    })
}

pub async fn remove_role(
    client: &GeorchestraLdapClient,
    args: RemoveUserRoleArgs,
    json: bool,
) -> CliResult<Status> {
    let outcome = client.remove_user_role(&args.email, &args.role).await?;

    output::report(&outcome, json, |role_dn| {
        output::print_success(&format!("{} removed from {role_dn}", args.email));
    })
}

pub async fn update_org(
    client: &GeorchestraLdapClient,
    args: UpdateUserOrgArgs,
    json: bool,
) -> CliResult<Status> {
    let outcome = client.update_user_org(&args.user_dn, &args.org).await?;

    output::report(&outcome, json, |org_dn| {
        output::print_success(&format!("{} added to {org_dn}", args.user_dn));
    })
}
