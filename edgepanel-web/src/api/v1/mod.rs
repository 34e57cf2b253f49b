use std::sync::Arc;

use axum::Router;

use crate::HttpApiState;

pub mod health;
pub mod query;
pub mod render;
pub mod stream;

pub(super) fn router() -> Router<Arc<HttpApiState>> {
    Router::new()
        .nest("/query", query::router())
        .nest("/render", render::router())
        .nest("/health", health::router())
        .nest("/stream", stream::router())
}
