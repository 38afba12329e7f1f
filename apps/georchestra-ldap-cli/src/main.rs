//! georchestra-ldap - geOrchestra identity lifecycle from the command line
//!
//! One subcommand per lifecycle operation. Directory settings are read from the
//! `LDAP_*` environment variables:
//!
//! - `LDAP_SERVER`, `LDAP_PORT`, `LDAP_USE_SSL`
//! - `LDAP_USER_DN`, `LDAP_PASSWORD`
//! - `LDAP_SEARCH_BASE`, `LDAP_USERS_DN`, `LDAP_PENDING_USERS_DN`, `LDAP_ORG_DN`, `LDAP_ROLE_DN`
//! - `LDAP_MAIL_ATTRIBUTE`, `LDAP_DEFAULT_ROLE_CN`, `LDAP_DEFAULT_ORG_CN`
//! - `LDAP_CONNECT_TIMEOUT_SECS`

use clap::{Parser, Subcommand};
use georchestra_ldap::GeorchestraLdapClient;
use tracing::debug;

mod commands;
mod error;
mod logging;
mod output;

use commands::{membership, roles, users};
use error::CliResult;
use output::Status;

/// geOrchestra LDAP identity lifecycle
#[derive(Parser)]
#[command(name = "georchestra-ldap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Write logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a user under the pending subtree
    CreateUser(users::CreateUserArgs),

    /// Move a pending user to the active users
    ModerateUser(users::EmailArgs),

    /// Remove a user from its groups, then delete it
    DeleteUser(users::EmailArgs),

    /// Replace the surname of a user
    UpdateLastname(users::UpdateLastnameArgs),

    /// Show a user record
    UserInfo(users::EmailArgs),

    /// List the role names of a user
    UserRoles(users::EmailArgs),

    /// Print the DN of the user with this e-mail address
    FindUser(users::EmailArgs),

    /// Create a role
    CreateRole(roles::CreateRoleArgs),

    /// Remove every member of a role, then delete it
    DeleteRole(roles::RoleArgs),

    /// Show a role record
    RoleInfo(roles::RoleArgs),

    /// Check whether a role exists
    RoleExists(roles::RoleArgs),

    /// Create an organization
    CreateOrg(roles::CreateOrgArgs),

    /// Add a user to a role
    AddUserRole(membership::AddUserRoleArgs),

    /// Remove a user from a role
    RemoveUserRole(membership::RemoveUserRoleArgs),

    /// Add a user to an organization
    UpdateUserOrg(membership::UpdateUserOrgArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.log_json);

    match run(cli).await {
        Ok(status) => std::process::exit(status.exit_code()),
        Err(e) => {
            e.print();
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> CliResult<Status> {
    let client = GeorchestraLdapClient::new(None)?;
    debug!(settings = ?client.settings(), "Settings loaded");

    let json = cli.json;
    match cli.command {
        Commands::CreateUser(args) => users::create(&client, args, json).await,
        Commands::ModerateUser(args) => users::moderate(&client, args, json).await,
        Commands::DeleteUser(args) => users::delete(&client, args, json).await,
        Commands::UpdateLastname(args) => users::update_lastname(&client, args, json).await,
        Commands::UserInfo(args) => users::info(&client, args, json).await,
        Commands::UserRoles(args) => users::roles(&client, args, json).await,
        Commands::FindUser(args) => users::find(&client, args, json).await,
        Commands::CreateRole(args) => roles::create(&client, args, json).await,
        Commands::DeleteRole(args) => roles::delete(&client, args, json).await,
        Commands::RoleInfo(args) => roles::info(&client, args, json).await,
        Commands::RoleExists(args) => roles::exists(&client, args, json).await,
        Commands::CreateOrg(args) => roles::create_org(&client, args, json).await,
        Commands::AddUserRole(args) => membership::add_role(&client, args, json).await,
        Commands::RemoveUserRole(args) => membership::remove_role(&client, args, json).await,
        Commands::UpdateUserOrg(args) => membership::update_org(&client, args, json).await,
    }
}
