use std::{
    collections::{hash_map::Entry, HashMap},
    sync::{Arc, RwLock},
};

use chrono::{DateTime, Utc};
use edgepanel_core::err::{Error, Result};
use edgepanel_logging::{info, warn};
use serde::{Deserialize, Serialize};

/// Stores the health status of each subsystem
#[derive(Clone, Default)]
pub struct Health {
    /// Mapping of the subsytem name to the healthy status
    state: Arc<RwLock<HashMap<String, HealthStatus>>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    /// Is the system healthy?
    pub healthy: bool,
    /// When was it last checked?
    pub checked: DateTime<Utc>,
    /// When was it last healthy?
    pub last_healthy: Option<DateTime<Utc>>,
    /// Message from the most recent check
    pub message: Option<String>,
}

impl Health {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the health state
    pub fn check(&self) -> Result<HashMap<String, HealthStatus>> {
        Ok(self
            .state
            .read()
            .map_err(|_| Error::msg("Failed to lock health state"))?
            .clone())
    }

    /// Whether every reported subsystem is healthy
    pub fn is_healthy(&self) -> Result<bool> {
        Ok(self.check()?.values().all(|s| s.healthy))
    }

    /// Updates the health status of a system
    pub fn update(&self, subsystem: &str, healthy: bool) -> Result<()> {
        self.update_with_message(subsystem, healthy, None)
    }

    /// Updates the health status of a system, recording the check's message
    pub fn update_with_message(
        &self,
        subsystem: &str,
        healthy: bool,
        message: Option<String>,
    ) -> Result<()> {
        let mut state = self
            .state
            .write()
            .map_err(|_| Error::msg("Failed to lock health state"))?;

        let now = Utc::now();

        match state.entry(subsystem.into()) {
            Entry::Occupied(mut s) => {
                let s = s.get_mut();

                match (s.healthy, healthy) {
                    (true, false) => warn!("Subsystem '{subsystem}' changed to unhealthy"),
                    (false, true) => info!("Subsystem '{subsystem}' changed to healthy"),
                    _ => {}
                }

                s.healthy = healthy;
                s.checked = now;
                s.message = message;
                if healthy {
                    s.last_healthy = Some(now)
                }
            }
            Entry::Vacant(s) => {
                s.insert(HealthStatus {
                    healthy,
                    checked: now,
                    last_healthy: if healthy { Some(now) } else { None },
                    message,
                });
            }
        }

        Ok(())
    }
}
