use std::{convert::Infallible, sync::Arc};

use axum::{
    extract::{Json, Path, State},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing, Router,
};
use edgepanel_backend::{publish_stream, run_stream, subscribe_stream};
use edgepanel_core::proto::{
    PublishStreamRequest, PublishStreamResponse, StreamStatus, SubscribeStreamRequest,
};
use edgepanel_logging::warn;
use hyper::StatusCode;
use tokio::sync::mpsc;
use tokio_stream::{wrappers::ReceiverStream, StreamExt};

use crate::HttpApiState;

/// Frames buffered per subscriber before new ones are dropped
const STREAM_BUFFER: usize = 16;

/// Subscribes to the stream as server-sent events
async fn subscribe(State(state): State<Arc<HttpApiState>>, Path(path): Path<String>) -> Response {
    let res = subscribe_stream(&SubscribeStreamRequest { path: path.clone() });

    if res.status != StreamStatus::Ok {
        return (StatusCode::FORBIDDEN, Json(res)).into_response();
    }

    let (tx, rx) = mpsc::channel(STREAM_BUFFER);
    tokio::spawn(run_stream(
        path,
        state.stream_interval(),
        tx,
        state.subscribe_shutdown(),
    ));

    let events = ReceiverStream::new(rx).filter_map(|frame| {
        match Event::default().json_data(&frame) {
            Ok(event) => Some(Ok::<_, Infallible>(event)),
            Err(err) => {
                warn!("Failed to serialize stream frame: {:?}", err);
                None
            }
        }
    });

    Sse::new(events)
        .keep_alive(KeepAlive::default())
        .into_response()
}

async fn publish(
    Path(path): Path<String>,
    Json(data): Json<serde_json::Value>,
) -> (StatusCode, Json<PublishStreamResponse>) {
    let res = publish_stream(&PublishStreamRequest { path, data });

    let status = match res.status {
        StreamStatus::Ok => StatusCode::OK,
        StreamStatus::NotFound => StatusCode::NOT_FOUND,
        StreamStatus::PermissionDenied => StatusCode::FORBIDDEN,
    };

    (status, Json(res))
}

pub(super) fn router() -> Router<Arc<HttpApiState>> {
    Router::new().route("/:path", routing::get(subscribe).post(publish))
}
