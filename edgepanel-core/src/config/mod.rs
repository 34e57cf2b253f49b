use serde::{Deserialize, Serialize};

mod datasource;
pub use datasource::*;
mod networking;
pub use networking::*;
mod stream;
pub use stream::*;

/// An entire configuration for an edgepanel backend
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Default)]
pub struct NodeConfig {
    /// The human-readable name of the data source
    pub name: String,
    /// The description of this data source
    pub description: Option<String>,
    /// Networking options
    #[serde(default)]
    pub networking: NetworkingConfig,
    /// Connection settings for the EdgeDB instance
    #[serde(default)]
    pub datasource: DataSourceSettings,
    /// Secrets used to connect to the EdgeDB instance
    #[serde(default)]
    pub secure: SecureSettings,
    /// Streaming options
    #[serde(default)]
    pub stream: StreamConfig,
}
