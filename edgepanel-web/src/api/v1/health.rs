use std::sync::Arc;

use axum::{extract::State, routing, Json, Router};
use edgepanel_core::proto::CheckHealthResult;
use hyper::StatusCode;

use crate::{api::health_status, HttpApiState};

/// Runs the data source health check
async fn handler(State(state): State<Arc<HttpApiState>>) -> (StatusCode, Json<CheckHealthResult>) {
    let result = state.datasource().check_health().await;

    (health_status(result.is_ok()), Json(result))
}

pub(super) fn router() -> Router<Arc<HttpApiState>> {
    Router::new().route("/", routing::get(handler))
}
