use std::sync::Arc;

use axum::{
    extract::{Json, State},
    routing, Router,
};
use edgepanel_core::proto::{QueryDataRequest, QueryDataResponse};
use edgepanel_logging::debug;

use crate::HttpApiState;

/// Renders and executes every query in the request. Failures are
/// reported per query in the response body.
async fn handler(
    State(state): State<Arc<HttpApiState>>,
    Json(payload): Json<QueryDataRequest>,
) -> Json<QueryDataResponse> {
    debug!("Received {} queries", payload.queries.len());

    Json(state.datasource().query_data(&payload).await)
}

pub(super) fn router() -> Router<Arc<HttpApiState>> {
    Router::new().route("/", routing::post(handler))
}
