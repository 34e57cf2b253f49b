use std::{sync::Arc, time::Duration};

use edgepanel_backend::EdgeDbDataSource;
use edgepanel_util_health::Health;
use tokio::sync::broadcast;

/// Required state and dependencies for the http api
#[derive(Clone)]
pub struct HttpApiState {
    /// The configured data source
    datasource: Arc<EdgeDbDataSource>,
    /// Health of each subsystem
    health: Health,
    /// How often stream frames are sent
    stream_interval: Duration,
    /// Fires when the server is shutting down
    shutdown: broadcast::Sender<()>,
}

impl HttpApiState {
    pub fn new(
        datasource: Arc<EdgeDbDataSource>,
        health: Health,
        stream_interval: Duration,
    ) -> Self {
        let (shutdown, _) = broadcast::channel(1);

        Self {
            datasource,
            health,
            stream_interval,
            shutdown,
        }
    }

    pub fn datasource(&self) -> &EdgeDbDataSource {
        &self.datasource
    }

    pub fn health(&self) -> &Health {
        &self.health
    }

    pub fn stream_interval(&self) -> Duration {
        self.stream_interval
    }

    /// Receives a message once the server begins shutting down
    pub fn subscribe_shutdown(&self) -> broadcast::Receiver<()> {
        self.shutdown.subscribe()
    }

    pub(crate) fn shutdown_sender(&self) -> broadcast::Sender<()> {
        self.shutdown.clone()
    }
}
