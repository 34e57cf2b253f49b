use std::{collections::HashMap, path::PathBuf, sync::Arc};

use edgepanel_backend::{ConnectionConfig, EdgeDbDataSource, HttpExecutor};
use edgepanel_core::{
    config::NodeConfig,
    err::{Context, Result},
};
use edgepanel_logging::{info, warn};
use edgepanel_util_health::Health;
use edgepanel_web::{HttpApi, HttpApiState};
use tokio::runtime::Runtime;

pub mod args;
pub mod conf;

use args::Args;
use conf::*;

/// This struct represents a running instance of the backend and its
/// subsystems.
pub struct EdgePanel {
    /// The configuration used
    conf: NodeConfig,
    /// The tokio runtime
    runtime: Runtime,
    /// Running subsystems
    subsystems: Option<Subsystems>,
}

pub struct Subsystems {
    /// The configured data source
    datasource: Arc<EdgeDbDataSource>,
    /// Subsystem health registry
    health: Health,
    /// The http api
    http: HttpApi,
}

impl Subsystems {
    pub fn datasource(&self) -> &EdgeDbDataSource {
        &self.datasource
    }

    pub fn health(&self) -> &Health {
        &self.health
    }

    pub fn http(&self) -> &HttpApi {
        &self.http
    }
}

impl EdgePanel {
    /// This is the entrypoint to booting the backend.
    pub fn main(args: Args) -> Result<()> {
        edgepanel_logging::init_logging()?;
        info!("Hi, thanks for using edgepanel!");

        let config_path = args
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        let conf = init_conf(&config_path, args_map(&args))?;

        Self::start(conf)?.wait()
    }

    /// Starts the data source and the http api using the supplied config
    pub fn start(conf: NodeConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .thread_name("edgepanel-tokio-worker")
            .enable_all()
            .build()
            .context("Failed to create tokio runtime")?;

        info!("Initializing data source '{}'...", conf.name);
        let connection = ConnectionConfig::try_from(&conf)?;
        info!("Connecting to {:?}", connection);
        let executor = HttpExecutor::new(&connection).context("Failed to create executor")?;

        let health = Health::new();
        let datasource = Arc::new(EdgeDbDataSource::new(Arc::new(executor), health.clone()));

        let check = runtime.block_on(datasource.check_health());
        if check.is_ok() {
            info!("{}", check.message);
        } else {
            warn!("{}", check.message);
        }

        info!("Starting http api...");
        let http = runtime.block_on(HttpApi::start(
            bind_addr(&conf.networking),
            HttpApiState::new(datasource.clone(), health.clone(), conf.stream.interval()),
        ))?;

        info!("Start up complete...");
        Ok(Self {
            conf,
            runtime,
            subsystems: Some(Subsystems {
                datasource,
                health,
                http,
            }),
        })
    }

    /// Gets the node config
    pub fn conf(&self) -> &NodeConfig {
        &self.conf
    }

    /// Gets the running subsystems
    pub fn subsystems(&self) -> Option<&Subsystems> {
        self.subsystems.as_ref()
    }

    /// Waits for SIGINT or SIGTERM, then shuts down
    pub fn wait(self) -> Result<()> {
        let sig = self.runtime.block_on(wait_for_signal())?;
        info!("Received {}", sig);

        self.terminate()
    }

    /// Stops the http api and releases the data source
    pub fn terminate(mut self) -> Result<()> {
        let subsystems = match self.subsystems.take() {
            Some(s) => s,
            None => return Ok(()),
        };

        info!("Terminating...");
        self.runtime
            .block_on(subsystems.http.terminate())
            .context("Failed to terminate http api")?;
        self.runtime
            .block_on(subsystems.datasource.dispose())
            .context("Failed to dispose data source")?;

        info!("Graceful shutdown complete");
        Ok(())
    }
}

#[cfg(unix)]
async fn wait_for_signal() -> Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = signal(SignalKind::terminate()).context("Failed to attach signal handler")?;

    tokio::select! {
        res = tokio::signal::ctrl_c() => {
            res.context("Failed to attach signal handler")?;
            Ok("SIGINT")
        }
        _ = term.recv() => Ok("SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .context("Failed to attach signal handler")?;
    Ok("SIGINT")
}

/// Builds the args map passed to the config loader
pub fn args_map(args: &Args) -> HashMap<String, String> {
    args.args.iter().cloned().collect()
}
