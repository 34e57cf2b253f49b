use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Query, State},
    routing, Json, Router,
};
use edgepanel_backend::HEALTH_SUBSYSTEM;
use edgepanel_logging::warn;
use edgepanel_util_health::HealthStatus;
use hyper::StatusCode;
use serde::{Deserialize, Serialize};

use super::health_status;
use crate::HttpApiState;

/// Status of the service as a whole
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    /// The data source has been checked and nothing reports a failure
    pub healthy: bool,
    pub subsystems: BTreeMap<String, HealthStatus>,
}

impl HealthReport {
    fn new(subsystems: BTreeMap<String, HealthStatus>) -> Self {
        let healthy = subsystems.contains_key(HEALTH_SUBSYSTEM)
            && subsystems.values().all(|s| s.healthy);

        Self {
            healthy,
            subsystems,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct HealthParams {
    /// Check the data source before reporting
    #[serde(default)]
    refresh: bool,
}

/// Reports the recorded status of the data source, optionally checking it
/// first. The service is unavailable until the data source was checked.
async fn handler(
    State(state): State<Arc<HttpApiState>>,
    Query(params): Query<HealthParams>,
) -> Result<(StatusCode, Json<HealthReport>), (StatusCode, &'static str)> {
    if params.refresh {
        state.datasource().check_health().await;
    }

    let subsystems = state.health().check().map_err(|e| {
        warn!("Failed to read health registry: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to read health registry",
        )
    })?;

    let report = HealthReport::new(subsystems.into_iter().collect());

    Ok((health_status(report.healthy), Json(report)))
}

pub(super) fn router() -> Router<Arc<HttpApiState>> {
    Router::new().route("/", routing::get(handler))
}

#[cfg(test)]
mod tests {
    use edgepanel_core::data::chrono::Utc;

    use super::*;

    fn status(healthy: bool) -> HealthStatus {
        HealthStatus {
            healthy,
            checked: Utc::now(),
            last_healthy: None,
            message: None,
        }
    }

    #[test]
    fn test_report_requires_checked_data_source() {
        assert!(!HealthReport::new(BTreeMap::new()).healthy);
        assert!(!HealthReport::new([("other".to_string(), status(true))].into()).healthy);
        assert!(HealthReport::new([(HEALTH_SUBSYSTEM.to_string(), status(true))].into()).healthy);
    }

    #[test]
    fn test_report_unhealthy_when_any_subsystem_fails() {
        let report = HealthReport::new(
            [
                (HEALTH_SUBSYSTEM.to_string(), status(true)),
                ("other".to_string(), status(false)),
            ]
            .into(),
        );

        assert!(!report.healthy);
    }
}
