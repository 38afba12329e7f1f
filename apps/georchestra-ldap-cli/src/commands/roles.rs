//! Role and organization commands

use clap::Args;
use georchestra_ldap::{DeletedEntry, GeorchestraLdapClient};
use serde::Serialize;

use crate::error::CliResult;
use crate::output::{self, Status};

/// Arguments for commands addressing a role by common name
#[derive(Args)]
pub struct RoleArgs {
    /// Role common name, e.g. SUPERUSER
    pub cn: String,
}

/// Arguments for the create-role command
#[derive(Args)]
pub struct CreateRoleArgs {
    /// Role common name
    pub cn: String,

    /// Role description
    #[arg(long)]
    pub description: Option<String>,

    /// Initial member DN (repeatable)
    #[arg(long = "member", value_name = "DN")]
    pub members: Vec<String>,
}

/// Arguments for the create-org command
#[derive(Args)]
pub struct CreateOrgArgs {
    /// Organization common name
    pub cn: String,

    /// Display name, defaults to the common name
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Serialize)]
struct RoleExistsOutput<'a> {
    cn: &'a str,
    exists: bool,
}

pub async fn create(
    client: &GeorchestraLdapClient,
    args: CreateRoleArgs,
    json: bool,
) -> CliResult<Status> {
    let outcome = client
        .create_role(&args.cn, args.description.as_deref(), &args.members)
        .await?;

    output::report(&outcome, json, |dn| {
        output::print_success(&format!("Role {} created", args.cn));
        output::print_key_value("DN", dn);
    })
}

pub async fn delete(
    client: &GeorchestraLdapClient,
    args: RoleArgs,
    json: bool,
) -> CliResult<Status> {
    let outcome = client.delete_role(&args.cn).await?;

    let status = output::report(&outcome, json, |deleted| {
        output::print_attempts("Removed", &deleted.membership_removals);
        output::print_success(&format!("Role {} deleted", deleted.dn));
    })?;
    Ok(status.partial_if(outcome.as_applied().is_some_and(DeletedEntry::is_partial)))
}

pub async fn info(
    client: &GeorchestraLdapClient,
    args: RoleArgs,
    json: bool,
) -> CliResult<Status> {
    let outcome = client.get_role_info(&args.cn).await?;

    output::report(&outcome, json, |role| {
        println!();
        output::print_key_value("DN", &role.dn);
        output::print_key_value("cn", role.cn.as_deref().unwrap_or("-"));
        output::print_key_value("description", role.description.as_deref().unwrap_or("-"));
        output::print_list("member", &role.members);
        println!();
    })
}

pub async fn exists(
    client: &GeorchestraLdapClient,
    args: RoleArgs,
    json: bool,
) -> CliResult<Status> {
    let exists = client.role_exists(&args.cn).await?;

    if json {
        output::print_json(&RoleExistsOutput {
            cn: &args.cn,
            exists,
        })?;
    } else if exists {
        output::print_success(&format!("Role {} exists", args.cn));
    } else {
        output::print_warning(&format!("Role {} does not exist", args.cn));
    }

    Ok(if exists { Status::Done } else { Status::Unchanged })
}

pub async fn create_org(
    client: &GeorchestraLdapClient,
    args: CreateOrgArgs,
    json: bool,
) -> CliResult<Status> {
    let outcome = client.create_org(&args.cn, args.name.as_deref()).await?;

    output::report(&outcome, json, |dn| {
        output::print_success(&format!("Organization {} created", args.cn));
        output::print_key_value("DN", dn);
    })
}
