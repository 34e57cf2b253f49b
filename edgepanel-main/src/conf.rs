use std::{
    collections::HashMap,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::Path,
};

use edgepanel_config::{ConfigLoader, ConfigParseError};
use edgepanel_core::{
    config::{NetworkingConfig, NodeConfig},
    err::{anyhow, Context, Result},
};
use edgepanel_logging::info;

/// Default location of the main configuration file
pub const DEFAULT_CONFIG_PATH: &str = "/etc/edgepanel/main.yml";

/// Loads the node configuration, printing yaml syntax errors with
/// the offending source lines
pub fn init_conf(config_path: &Path, args: HashMap<String, String>) -> Result<NodeConfig> {
    info!("Loading configuration...");

    ConfigLoader::new()
        .load(config_path, args)
        .map_err(|err| match err.downcast::<ConfigParseError>() {
            Ok(parse_err) => {
                let message = parse_err.message().to_string();
                parse_err.print();
                anyhow!("Invalid configuration: {}", message)
            }
            Err(err) => err,
        })
        .context("Failed to load configuration")
}

/// The address the http api listens on
pub fn bind_addr(networking: &NetworkingConfig) -> SocketAddr {
    (
        networking.bind.unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST)),
        networking.port,
    )
        .into()
}
