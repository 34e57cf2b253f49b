use std::time::Duration;

use chrono::Utc;
use edgepanel_core::{
    data::{Field, FieldValues, Frame},
    proto::{
        PublishStreamRequest, PublishStreamResponse, StreamStatus, SubscribeStreamRequest,
        SubscribeStreamResponse, STREAM_PATH,
    },
};
use edgepanel_logging::{debug, info, warn};
use tokio::{
    sync::{broadcast, mpsc},
    time::{self, Instant},
};

/// Only the `stream` path may be subscribed to
pub fn subscribe_stream(req: &SubscribeStreamRequest) -> SubscribeStreamResponse {
    let status = if req.path == STREAM_PATH {
        StreamStatus::Ok
    } else {
        StreamStatus::PermissionDenied
    };

    SubscribeStreamResponse { status }
}

/// Clients may never publish to a stream
pub fn publish_stream(_req: &PublishStreamRequest) -> PublishStreamResponse {
    PublishStreamResponse {
        status: StreamStatus::PermissionDenied,
    }
}

/// Builds the frame sent on the given tick
pub fn stream_frame(counter: u64) -> Frame {
    let value = 10 * (counter % 2 + 1) as i64;

    Frame::new("response")
        .with_field(Field::new("time", FieldValues::Time(vec![Utc::now()])))
        .with_field(Field::new("values", FieldValues::Int64(vec![value])))
}

/// Sends a frame to the subscriber every `interval` until shutdown is
/// signalled or the subscriber goes away. Losing the shutdown sender does
/// not end the stream.
///
/// A frame which cannot be sent because the subscriber is lagging is
/// dropped.
pub async fn run_stream(
    path: String,
    interval: Duration,
    sender: mpsc::Sender<Frame>,
    mut shutdown: broadcast::Receiver<()>,
) {
    info!("Starting stream on path '{}'", path);

    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    let mut counter = 0u64;
    // Once every shutdown sender is gone no signal can arrive
    let mut shutdown_closed = false;

    loop {
        tokio::select! {
            res = shutdown.recv(), if !shutdown_closed => match res {
                Err(broadcast::error::RecvError::Closed) => {
                    debug!("Shutdown channel closed for stream '{}'", path);
                    shutdown_closed = true;
                }
                Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {
                    info!("Stream '{}' received shutdown", path);
                    break;
                }
            },
            _ = ticker.tick() => {
                match sender.try_send(stream_frame(counter)) {
                    Ok(_) => debug!("Sent frame {} on stream '{}'", counter, path),
                    Err(mpsc::error::TrySendError::Full(_)) => warn!(
                        "Dropped frame {} on stream '{}', subscriber is lagging",
                        counter, path
                    ),
                    Err(mpsc::error::TrySendError::Closed(_)) => {
                        info!("Subscriber closed stream '{}'", path);
                        break;
                    }
                }

                counter += 1;
            }
        }
    }
}
