//! Coordinator facade
//!
//! [`GeorchestraLdapClient`] holds the current settings and a connector. Every
//! call re-applies the settings, opens one session, runs one lifecycle
//! operation on it and unbinds.

use std::sync::Arc;

use georchestra_directory::traits::{BoxedSession, DirectoryConnector};
use georchestra_directory_ldap::LdapDirectory;
use tracing::{error, info, warn};

use crate::codec::{NewUser, RoleInfo, UserInfo};
use crate::error::LifecycleResult;
use crate::operations;
use crate::outcome::{CreatedUser, DeletedEntry, Outcome};
use crate::settings::{LdapSettings, SettingsError};

/// Entry point for geOrchestra identity lifecycle operations.
///
/// ```ignore
/// use georchestra_ldap::{GeorchestraLdapClient, NewUser};
///
/// let client = GeorchestraLdapClient::new(None)?;
/// client.create_role("FOO", None, &[]).await?;
/// client
///     .create_user(&NewUser::new("alice", "alice@example.org", "Alice", "Example", "pwd"))
///     .await?;
/// client.moderate_user("alice@example.org").await?;
/// let roles = client.read_user_roles("alice@example.org").await?;
/// ```
pub struct GeorchestraLdapClient {
    settings: LdapSettings,
    connector: Arc<dyn DirectoryConnector>,
}

impl std::fmt::Debug for GeorchestraLdapClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeorchestraLdapClient")
            .field("settings", &self.settings)
            .field("connector", &self.connector.display_name())
            .finish()
    }
}

impl GeorchestraLdapClient {
    /// Create a client over LDAP, with settings from the environment when none
    /// are given.
    pub fn new(settings: Option<LdapSettings>) -> Result<Self, SettingsError> {
        let settings = match settings {
            Some(settings) => settings,
            None => LdapSettings::from_env()?,
        };
        Self::with_connector(settings, Arc::new(LdapDirectory::new()))
    }

    /// Create a client over any directory connector.
    pub fn with_connector(
        settings: LdapSettings,
        connector: Arc<dyn DirectoryConnector>,
    ) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self {
            settings,
            connector,
        })
    }

    /// Settings in force.
    pub fn settings(&self) -> &LdapSettings {
        &self.settings
    }

    /// Replace the settings, or re-check the current ones when `None`.
    ///
    /// Invalid settings are rejected and the previous ones stay in force.
    pub fn reload_settings(
        &mut self,
        settings: Option<LdapSettings>,
    ) -> Result<&mut Self, SettingsError> {
        if let Some(settings) = settings {
            settings.validate()?;
            info!(server = %settings.server, search_base = %settings.search_base, "Settings reloaded");
            self.settings = settings;
        } else {
            self.settings.validate()?;
        }
        Ok(self)
    }

    /// Open a bound session from the current settings for ad-hoc requests.
    ///
    /// The caller owns the session and should unbind it.
    pub async fn open_session(&self) -> LifecycleResult<BoxedSession> {
        self.begin("open_session").await
    }

    async fn begin(&self, action: &'static str) -> LifecycleResult<BoxedSession> {
        info!(action, "Running action");

        let connected: LifecycleResult<BoxedSession> = match self.settings.validate() {
            Ok(()) => self
                .connector
                .connect(&self.settings.connection_params())
                .await
                .map_err(Into::into),
            Err(e) => Err(e.into()),
        };

        connected.inspect_err(|e| error!(action, error = %e, "Action failed"))
    }

    async fn finish<T>(
        &self,
        action: &'static str,
        mut session: BoxedSession,
        result: LifecycleResult<T>,
    ) -> LifecycleResult<T> {
        if let Err(e) = session.unbind().await {
            warn!(action, error = %e, "Unbind failed");
        }
        if let Err(e) = &result {
            error!(action, error = %e, "Action failed");
        }
        result
    }

    /// Register a pending user and attach the default role and organization.
    pub async fn create_user(&self, user: &NewUser) -> LifecycleResult<Outcome<CreatedUser>> {
        let action = "create_user";
        let mut session = self.begin(action).await?;
        let result = operations::create_user(session.as_mut(), &self.settings, user).await;
        self.finish(action, session, result).await
    }

    /// Move a pending user to the active users subtree.
    pub async fn moderate_user(&self, email: &str) -> LifecycleResult<Outcome<String>> {
        let action = "moderate_user";
        let mut session = self.begin(action).await?;
        let result = operations::moderate_user(session.as_mut(), &self.settings, email).await;
        self.finish(action, session, result).await
    }

    /// Create a role if missing, optionally seeded with members.
    pub async fn create_role(
        &self,
        cn: &str,
        description: Option<&str>,
        members: &[String],
    ) -> LifecycleResult<Outcome<String>> {
        let action = "create_role";
        let mut session = self.begin(action).await?;
        let result =
            operations::create_role(session.as_mut(), &self.settings, cn, description, members)
                .await;
        self.finish(action, session, result).await
    }

    /// Create an organization if missing.
    pub async fn create_org(
        &self,
        cn: &str,
        name: Option<&str>,
    ) -> LifecycleResult<Outcome<String>> {
        let action = "create_org";
        let mut session = self.begin(action).await?;
        let result = operations::create_org(session.as_mut(), &self.settings, cn, name).await;
        self.finish(action, session, result).await
    }

    /// Remove every member of a role, then delete it.
    pub async fn delete_role(&self, cn: &str) -> LifecycleResult<Outcome<DeletedEntry>> {
        let action = "delete_role";
        let mut session = self.begin(action).await?;
        let result = operations::delete_role(session.as_mut(), &self.settings, cn).await;
        self.finish(action, session, result).await
    }

    /// Remove a user from all its groups, then delete it.
    pub async fn delete_user(&self, email: &str) -> LifecycleResult<Outcome<DeletedEntry>> {
        let action = "delete_user";
        let mut session = self.begin(action).await?;
        let result = operations::delete_user(session.as_mut(), &self.settings, email).await;
        self.finish(action, session, result).await
    }

    /// Add a user DN to a role.
    pub async fn add_user_role(
        &self,
        user_dn: &str,
        role_cn: &str,
    ) -> LifecycleResult<Outcome<String>> {
        let action = "add_user_role";
        let mut session = self.begin(action).await?;
        let result =
            operations::add_user_role(session.as_mut(), &self.settings, user_dn, role_cn).await;
        self.finish(action, session, result).await
    }

    /// Remove the user with this mail from a role.
    pub async fn remove_user_role(
        &self,
        email: &str,
        role_cn: &str,
    ) -> LifecycleResult<Outcome<String>> {
        let action = "remove_user_role";
        let mut session = self.begin(action).await?;
        let result =
            operations::remove_user_role(session.as_mut(), &self.settings, email, role_cn).await;
        self.finish(action, session, result).await
    }

    /// Add a user DN to an organization.
    pub async fn update_user_org(
        &self,
        user_dn: &str,
        org_cn: &str,
    ) -> LifecycleResult<Outcome<String>> {
        let action = "update_user_org";
        let mut session = self.begin(action).await?;
        let result =
            operations::update_user_org(session.as_mut(), &self.settings, user_dn, org_cn).await;
        self.finish(action, session, result).await
    }

    /// Replace the surname of a user DN.
    pub async fn update_lastname(&self, user_dn: &str, surname: &str) -> LifecycleResult<String> {
        let action = "update_lastname";
        let mut session = self.begin(action).await?;
        let result = operations::update_lastname(session.as_mut(), user_dn, surname).await;
        self.finish(action, session, result).await
    }

    /// DN, uid, cn, mail and groups of a user.
    pub async fn read_user_info(&self, email: &str) -> LifecycleResult<Outcome<UserInfo>> {
        self.user_info("read_user_info", email).await
    }

    /// Same record as [`read_user_info`](Self::read_user_info).
    pub async fn get_user_info(&self, email: &str) -> LifecycleResult<Outcome<UserInfo>> {
        self.user_info("get_user_info", email).await
    }

    async fn user_info(
        &self,
        action: &'static str,
        email: &str,
    ) -> LifecycleResult<Outcome<UserInfo>> {
        let mut session = self.begin(action).await?;
        let result = operations::read_user_info(session.as_mut(), &self.settings, email).await;
        self.finish(action, session, result).await
    }

    /// Role names of a user.
    pub async fn read_user_roles(&self, email: &str) -> LifecycleResult<Outcome<Vec<String>>> {
        let action = "read_user_roles";
        let mut session = self.begin(action).await?;
        let result = operations::read_user_roles(session.as_mut(), &self.settings, email).await;
        self.finish(action, session, result).await
    }

    /// DN, cn, description and members of a role.
    pub async fn get_role_info(&self, cn: &str) -> LifecycleResult<Outcome<RoleInfo>> {
        let action = "get_role_info";
        let mut session = self.begin(action).await?;
        let result = operations::get_role_info(session.as_mut(), &self.settings, cn).await;
        self.finish(action, session, result).await
    }

    /// Whether a role exists.
    pub async fn role_exists(&self, cn: &str) -> LifecycleResult<bool> {
        let action = "role_exists";
        let mut session = self.begin(action).await?;
        let result = operations::role_exists(session.as_mut(), &self.settings, cn).await;
        self.finish(action, session, result).await
    }

    /// DN of the user with this mail.
    pub async fn find_user_dn(&self, email: &str) -> LifecycleResult<Outcome<String>> {
        let action = "find_user_dn";
        let mut session = self.begin(action).await?;
        let result = operations::find_user_dn(session.as_mut(), &self.settings, email).await;
        self.finish(action, session, result).await
    }
}
