use std::sync::Arc;

use axum::{
    extract::{Json, State},
    routing, Router,
};
use edgepanel_core::proto::{QueryDataRequest, RenderResponse};

use crate::HttpApiState;

/// Returns the queries with their variables interpolated, without
/// executing them
async fn handler(
    State(state): State<Arc<HttpApiState>>,
    Json(payload): Json<QueryDataRequest>,
) -> Json<RenderResponse> {
    let mut res = RenderResponse::default();

    for (ref_id, rendered) in state.datasource().render(&payload) {
        match rendered {
            Ok(query) => res.queries.push(query),
            Err(err) => {
                res.errors.insert(ref_id, format!("{:#}", err));
            }
        }
    }

    Json(res)
}

pub(super) fn router() -> Router<Arc<HttpApiState>> {
    Router::new().route("/", routing::post(handler))
}
