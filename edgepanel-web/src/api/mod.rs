use std::sync::Arc;

use axum::Router;
use hyper::StatusCode;

use crate::HttpApiState;

mod healthcheck;
pub mod v1;

pub(super) fn router() -> Router<Arc<HttpApiState>> {
    Router::new()
        .nest("/health", healthcheck::router())
        .nest("/v1", v1::router())
}

/// Health endpoints answer 503 while the data source is unhealthy
pub(crate) fn health_status(healthy: bool) -> StatusCode {
    if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
