//! User lifecycle commands

use clap::Args;
use georchestra_ldap::{CreatedUser, DeletedEntry, GeorchestraLdapClient, NewUser, UserInfo};
use serde::Serialize;

use crate::error::CliResult;
use crate::output::{self, Status};

/// Arguments for commands addressing a user by mail
#[derive(Args)]
pub struct EmailArgs {
    /// User e-mail address
    pub email: String,
}

/// Arguments for the create-user command
#[derive(Args)]
pub struct CreateUserArgs {
    /// Login, also used as the entry RDN
    #[arg(long)]
    pub uid: String,

    /// E-mail address
    #[arg(long)]
    pub email: String,

    /// Given name
    #[arg(long)]
    pub given_name: String,

    /// Surname
    #[arg(long)]
    pub surname: String,

    /// Clear-text password, stored as {SSHA}
    #[arg(long, env = "GEORCHESTRA_USER_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// Arguments for the update-lastname command
#[derive(Args)]
pub struct UpdateLastnameArgs {
    /// DN of the user entry
    pub user_dn: String,

    /// New surname
    pub surname: String,
}

#[derive(Serialize)]
struct DnOutput<'a> {
    dn: &'a str,
}

pub async fn create(
    client: &GeorchestraLdapClient,
    args: CreateUserArgs,
    json: bool,
) -> CliResult<Status> {
    let user = NewUser::new(
        args.uid,
        args.email,
        args.given_name,
        args.surname,
        args.password,
    );
    let outcome = client.create_user(&user).await?;

    let status = output::report(&outcome, json, |created| {
        output::print_success(&format!("Pending user {} created", created.uid));
        output::print_key_value("DN", &created.dn);
        output::print_key_value("Identifier", &created.identifier);
        output::print_attempts("Member of", &created.memberships);
    })?;
    Ok(status.partial_if(outcome.as_applied().is_some_and(CreatedUser::is_partial)))
}

pub async fn moderate(
    client: &GeorchestraLdapClient,
    args: EmailArgs,
    json: bool,
) -> CliResult<Status> {
    let outcome = client.moderate_user(&args.email).await?;

    output::report(&outcome, json, |dn| {
        output::print_success(&format!("{} moderated", args.email));
        output::print_key_value("DN", dn);
    })
}

pub async fn delete(
    client: &GeorchestraLdapClient,
    args: EmailArgs,
    json: bool,
) -> CliResult<Status> {
    let outcome = client.delete_user(&args.email).await?;

    let status = output::report(&outcome, json, |deleted| {
        output::print_attempts("Left", &deleted.membership_removals);
        output::print_success(&format!("{} deleted", deleted.dn));
    })?;
    Ok(status.partial_if(outcome.as_applied().is_some_and(DeletedEntry::is_partial)))
}

pub async fn update_lastname(
    client: &GeorchestraLdapClient,
    args: UpdateLastnameArgs,
    json: bool,
) -> CliResult<Status> {
    let dn = client.update_lastname(&args.user_dn, &args.surname).await?;

    if json {
        output::print_json(&DnOutput { dn: &dn })?;
    } else {
        output::print_success(&format!("Surname of {dn} set to {}", args.surname));
    }
    Ok(Status::Done)
}

fn print_user(user: &UserInfo) {
    println!();
    output::print_key_value("DN", &user.dn);
    output::print_key_value("uid", user.uid.as_deref().unwrap_or("-"));
    output::print_key_value("cn", user.cn.as_deref().unwrap_or("-"));
    output::print_key_value("mail", user.mail.as_deref().unwrap_or("-"));
    output::print_list("memberOf", &user.member_of);
    println!();
}

pub async fn info(
    client: &GeorchestraLdapClient,
    args: EmailArgs,
    json: bool,
) -> CliResult<Status> {
    let outcome = client.read_user_info(&args.email).await?;
    output::report(&outcome, json, print_user)
}

pub async fn roles(
    client: &GeorchestraLdapClient,
    args: EmailArgs,
    json: bool,
) -> CliResult<Status> {
    let outcome = client.read_user_roles(&args.email).await?;

    output::report(&outcome, json, |roles| {
        for role in roles {
            println!("{role}");
        }
    })
}

pub async fn find(
    client: &GeorchestraLdapClient,
    args: EmailArgs,
    json: bool,
) -> CliResult<Status> {
    let outcome = client.find_user_dn(&args.email).await?;
    output::report(&outcome, json, |dn| println!("{dn}"))
}
