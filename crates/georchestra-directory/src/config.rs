//! Connection parameters
//!
//! Everything a [`DirectoryConnector`](crate::traits::DirectoryConnector) needs
//! to open and bind one session.

use serde::{Deserialize, Serialize};

use crate::error::{DirectoryError, DirectoryResult};

/// Parameters for opening a bound directory session.
#[derive(Clone, Serialize, Deserialize)]
pub struct ConnectionParams {
    /// Server hostname or IP address (no scheme).
    pub host: String,

    /// Server port (389 for LDAP, 636 for LDAPS).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Use an implicit TLS connection (LDAPS).
    #[serde(default)]
    pub use_tls: bool,

    /// DN used for the simple bind.
    #[serde(default)]
    pub bind_dn: String,

    /// Password used for the simple bind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bind_password: Option<String>,

    /// Connection timeout in seconds.
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout_secs: u64,
}

impl std::fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("use_tls", &self.use_tls)
            .field("bind_dn", &self.bind_dn)
            .field(
                "bind_password",
                &self.bind_password.as_ref().map(|_| "***REDACTED***"),
            )
            .field("connection_timeout_secs", &self.connection_timeout_secs)
            .finish()
    }
}

fn default_port() -> u16 {
    389
}

fn default_connection_timeout() -> u64 {
    30
}

impl ConnectionParams {
    /// Create parameters for an anonymous plain-LDAP connection.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            use_tls: false,
            bind_dn: String::new(),
            bind_password: None,
            connection_timeout_secs: default_connection_timeout(),
        }
    }

    /// Enable implicit TLS.
    #[must_use]
    pub fn with_tls(mut self, use_tls: bool) -> Self {
        self.use_tls = use_tls;
        self
    }

    /// Set the bind identity.
    pub fn with_bind(mut self, bind_dn: impl Into<String>, password: impl Into<String>) -> Self {
        self.bind_dn = bind_dn.into();
        self.bind_password = Some(password.into());
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub fn with_connection_timeout(mut self, secs: u64) -> Self {
        self.connection_timeout_secs = secs;
        self
    }

    /// Get connection timeout as Duration.
    pub fn connection_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.connection_timeout_secs)
    }

    /// Get the server URL.
    #[must_use]
    pub fn url(&self) -> String {
        let scheme = if self.use_tls { "ldaps" } else { "ldap" };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }

    /// Validate the parameters before connecting.
    pub fn validate(&self) -> DirectoryResult<()> {
        if self.host.is_empty() {
            return Err(DirectoryError::InvalidConfiguration {
                message: "host is required".to_string(),
            });
        }

        if self.host.contains("://") {
            return Err(DirectoryError::InvalidConfiguration {
                message: format!("host must not carry a scheme: {}", self.host),
            });
        }

        if self.port == 0 {
            return Err(DirectoryError::InvalidConfiguration {
                message: "port must be non-zero".to_string(),
            });
        }

        Ok(())
    }
}
