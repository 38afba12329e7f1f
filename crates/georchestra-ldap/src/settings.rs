//! Directory settings
//!
//! Endpoint, bind credentials and the DN templates of the geOrchestra tree.
//! Templates are relative to the search base; every derived base DN is
//! `template + "," + search_base`.

use serde::{Deserialize, Serialize};

use georchestra_directory::config::ConnectionParams;

const DEFAULT_SERVER: &str = "ldap://localhost";
const DEFAULT_PORT: u16 = 389;
const DEFAULT_BIND_DN: &str = "cn=admin,dc=georchestra,dc=org";
const DEFAULT_BIND_PASSWORD: &str = "secret";
const DEFAULT_USERS_DN: &str = "ou=users";
const DEFAULT_PENDING_USERS_DN: &str = "ou=pendingusers";
const DEFAULT_ORG_DN: &str = "ou=orgs";
const DEFAULT_ROLE_DN: &str = "ou=roles";
const DEFAULT_SEARCH_BASE: &str = "dc=georchestra,dc=org";
const DEFAULT_MAIL_ATTRIBUTE: &str = "mail";
const DEFAULT_ROLE_CN: &str = "USER";
const DEFAULT_ORG_CN: &str = "C2C";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Settings shared by every lifecycle operation.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LdapSettings {
    /// Server address, with or without an `ldap://` / `ldaps://` scheme.
    pub server: String,

    pub port: u16,

    /// Use LDAPS. Implied by an `ldaps://` server address.
    pub use_tls: bool,

    /// DN used for the simple bind.
    pub bind_dn: String,

    /// Bind password (never logged).
    pub bind_password: String,

    /// Active users template, e.g. `ou=users`.
    pub users_dn: String,

    /// Pending users template, e.g. `ou=pendingusers`.
    pub pending_users_dn: String,

    /// Organizations template, e.g. `ou=orgs`.
    pub org_dn: String,

    /// Roles template, e.g. `ou=roles`.
    pub role_dn: String,

    /// Root of the geOrchestra tree.
    pub search_base: String,

    /// Attribute holding the user e-mail address.
    pub mail_attribute: String,

    /// Role every new user joins.
    pub default_role_cn: String,

    /// Organization every new user joins.
    pub default_org_cn: String,

    /// Connection timeout handed to the directory client.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_connect_timeout() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

impl Default for LdapSettings {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            port: DEFAULT_PORT,
            use_tls: false,
            bind_dn: DEFAULT_BIND_DN.to_string(),
            bind_password: DEFAULT_BIND_PASSWORD.to_string(),
            users_dn: DEFAULT_USERS_DN.to_string(),
            pending_users_dn: DEFAULT_PENDING_USERS_DN.to_string(),
            org_dn: DEFAULT_ORG_DN.to_string(),
            role_dn: DEFAULT_ROLE_DN.to_string(),
            search_base: DEFAULT_SEARCH_BASE.to_string(),
            mail_attribute: DEFAULT_MAIL_ATTRIBUTE.to_string(),
            default_role_cn: DEFAULT_ROLE_CN.to_string(),
            default_org_cn: DEFAULT_ORG_CN.to_string(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl std::fmt::Debug for LdapSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LdapSettings")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("use_tls", &self.use_tls)
            .field("bind_dn", &self.bind_dn)
            .field("bind_password", &"[REDACTED]")
            .field("users_dn", &self.users_dn)
            .field("pending_users_dn", &self.pending_users_dn)
            .field("org_dn", &self.org_dn)
            .field("role_dn", &self.role_dn)
            .field("search_base", &self.search_base)
            .field("mail_attribute", &self.mail_attribute)
            .field("default_role_cn", &self.default_role_cn)
            .field("default_org_cn", &self.default_org_cn)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

impl LdapSettings {
    /// Load settings from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_reader(|key| std::env::var(key))
    }

    /// Load settings from a custom variable reader.
    ///
    /// This allows tests to supply variables without mutating process-global
    /// environment state.
    pub fn from_reader<F>(reader: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let text = |key: &str, default: &str| reader(key).unwrap_or_else(|_| default.to_string());

        let port = reader("LDAP_PORT")
            .unwrap_or_else(|_| DEFAULT_PORT.to_string())
            .trim()
            .parse::<u16>()
            .map_err(|e| SettingsError::InvalidValue("LDAP_PORT".into(), e.to_string()))?;

        let use_tls = reader("LDAP_USE_SSL")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        let connect_timeout_secs = reader("LDAP_CONNECT_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_CONNECT_TIMEOUT_SECS.to_string())
            .trim()
            .parse::<u64>()
            .map_err(|e| {
                SettingsError::InvalidValue("LDAP_CONNECT_TIMEOUT_SECS".into(), e.to_string())
            })?;

        Ok(Self {
            server: text("LDAP_SERVER", DEFAULT_SERVER),
            port,
            use_tls,
            bind_dn: text("LDAP_USER_DN", DEFAULT_BIND_DN),
            bind_password: text("LDAP_PASSWORD", DEFAULT_BIND_PASSWORD),
            users_dn: text("LDAP_USERS_DN", DEFAULT_USERS_DN),
            pending_users_dn: text("LDAP_PENDING_USERS_DN", DEFAULT_PENDING_USERS_DN),
            org_dn: text("LDAP_ORG_DN", DEFAULT_ORG_DN),
            role_dn: text("LDAP_ROLE_DN", DEFAULT_ROLE_DN),
            search_base: text("LDAP_SEARCH_BASE", DEFAULT_SEARCH_BASE),
            mail_attribute: text("LDAP_MAIL_ATTRIBUTE", DEFAULT_MAIL_ATTRIBUTE),
            default_role_cn: text("LDAP_DEFAULT_ROLE_CN", DEFAULT_ROLE_CN),
            default_org_cn: text("LDAP_DEFAULT_ORG_CN", DEFAULT_ORG_CN),
            connect_timeout_secs,
        })
    }

    /// Check the settings before they are used for a session.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.port == 0 {
            return Err(SettingsError::Invalid("port must be non-zero".into()));
        }

        if self.host().is_empty() {
            return Err(SettingsError::Invalid("server address is empty".into()));
        }

        if self.search_base.trim().is_empty() {
            return Err(SettingsError::Invalid("search base is empty".into()));
        }

        if self.mail_attribute.trim().is_empty() {
            return Err(SettingsError::Invalid("mail attribute is empty".into()));
        }

        let base = self.search_base.trim().to_lowercase();
        for (name, template) in self.templates() {
            let template = template.trim();
            if template.is_empty() {
                return Err(SettingsError::Invalid(format!("{name} template is empty")));
            }
            if template.to_lowercase().ends_with(&base) {
                return Err(SettingsError::Invalid(format!(
                    "{name} template '{template}' must be relative to the search base"
                )));
            }
        }

        Ok(())
    }

    fn templates(&self) -> [(&'static str, &str); 4] {
        [
            ("users", &self.users_dn),
            ("pending users", &self.pending_users_dn),
            ("organizations", &self.org_dn),
            ("roles", &self.role_dn),
        ]
    }

    /// Host part of the server address, without scheme or port.
    pub fn host(&self) -> &str {
        let server = self.server.trim();
        let without_scheme = server
            .strip_prefix("ldaps://")
            .or_else(|| server.strip_prefix("ldap://"))
            .unwrap_or(server);
        without_scheme
            .split(['/', ':'])
            .next()
            .unwrap_or(without_scheme)
    }

    /// Whether the session must use LDAPS.
    pub fn tls_enabled(&self) -> bool {
        self.use_tls || self.server.trim().starts_with("ldaps://")
    }

    /// Connection parameters for the directory capability.
    pub fn connection_params(&self) -> ConnectionParams {
        ConnectionParams::new(self.host(), self.port)
            .with_tls(self.tls_enabled())
            .with_bind(self.bind_dn.clone(), self.bind_password.clone())
            .with_connection_timeout(self.connect_timeout_secs)
    }

    fn under_base(&self, template: &str) -> String {
        format!("{},{}", template.trim(), self.search_base.trim())
    }

    /// Base DN of active users.
    pub fn users_base(&self) -> String {
        self.under_base(&self.users_dn)
    }

    /// Base DN of pending users.
    pub fn pending_users_base(&self) -> String {
        self.under_base(&self.pending_users_dn)
    }

    /// Base DN of organizations.
    pub fn orgs_base(&self) -> String {
        self.under_base(&self.org_dn)
    }

    /// Base DN of roles.
    pub fn roles_base(&self) -> String {
        self.under_base(&self.role_dn)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Settings errors.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),

    #[error("invalid settings: {0}")]
    Invalid(String),
}
