use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use super::networking::opt_port_from_num_or_string;

/// How strictly the TLS connection to EdgeDB is verified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TlsMode {
    /// Verify the certificate chain and the host name
    #[default]
    Strict,
    /// Verify the certificate chain only
    NoHostVerification,
    /// Accept any certificate
    Insecure,
}

impl TlsMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TlsMode::Strict => "strict",
            TlsMode::NoHostVerification => "no_host_verification",
            TlsMode::Insecure => "insecure",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "strict" => Some(TlsMode::Strict),
            "no_host_verification" => Some(TlsMode::NoHostVerification),
            "insecure" => Some(TlsMode::Insecure),
            _ => None,
        }
    }
}

impl Display for TlsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-secret connection settings of the data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceSettings {
    /// Hostname of the EdgeDB instance
    pub host: Option<String>,
    /// Port, the settings form stores this as a string
    #[serde(default, deserialize_with = "opt_port_from_num_or_string")]
    pub port: Option<u16>,
    /// Connection username
    pub user: Option<String>,
    /// Database name
    pub database: Option<String>,
    #[serde(default)]
    pub tls_mode: TlsMode,
}

/// Secret connection settings, never sent back to the host once stored
#[derive(Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SecureSettings {
    /// Connection password
    pub password: Option<String>,
    /// Full connection string, takes precedence over the individual settings
    #[serde(rename = "DSN", alias = "dsn")]
    pub dsn: Option<String>,
}

impl fmt::Debug for SecureSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureSettings")
            .field("password", &self.password.as_ref().map(|_| "****"))
            .field("dsn", &self.dsn.as_ref().map(|_| "****"))
            .finish()
    }
}

/// Which secure fields hold a stored value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SecureFields {
    #[serde(default)]
    pub password: bool,
    #[serde(default, rename = "DSN", alias = "dsn")]
    pub dsn: bool,
}

/// The settings object edited by the data source configuration form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceOptions {
    #[serde(default)]
    pub json_data: DataSourceSettings,
    #[serde(default)]
    pub secure_json_data: SecureSettings,
    #[serde(default)]
    pub secure_json_fields: SecureFields,
}

impl DataSourceOptions {
    pub fn new(json_data: DataSourceSettings) -> Self {
        Self {
            json_data,
            ..Default::default()
        }
    }

    /// Replaces the non-secret settings
    pub fn update(&mut self, json_data: DataSourceSettings) {
        self.json_data = json_data;
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.secure_json_data.password = Some(password.into());
    }

    /// Forgets the stored password so a new one can be entered
    pub fn reset_password(&mut self) {
        self.secure_json_fields.password = false;
        self.secure_json_data.password = Some(String::new());
    }

    pub fn set_dsn(&mut self, dsn: impl Into<String>) {
        self.secure_json_data.dsn = Some(dsn.into());
    }

    /// Forgets the stored connection string so a new one can be entered
    pub fn reset_dsn(&mut self) {
        self.secure_json_fields.dsn = false;
        self.secure_json_data.dsn = Some(String::new());
    }

    /// Whether a password is stored or pending
    pub fn is_password_configured(&self) -> bool {
        self.secure_json_fields.password || non_empty(&self.secure_json_data.password)
    }

    /// Whether a connection string is stored or pending
    pub fn is_dsn_configured(&self) -> bool {
        self.secure_json_fields.dsn || non_empty(&self.secure_json_data.dsn)
    }

    /// Marks pending secrets as stored and drops their plaintext
    pub fn persist_secrets(&mut self) {
        self.secure_json_fields.password = self.is_password_configured();
        self.secure_json_fields.dsn = self.is_dsn_configured();
        self.secure_json_data = SecureSettings::default();
    }
}

fn non_empty(val: &Option<String>) -> bool {
    val.as_ref().map(|v| !v.is_empty()).unwrap_or(false)
}
