use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    body::Bytes, error_handling::HandleErrorLayer, response::IntoResponse, Router,
};
use edgepanel_core::err::{Context, Result};
use edgepanel_logging::{error, info, warn};
use hyper::{header, StatusCode};
use tokio::{sync::broadcast, task::JoinHandle};

pub mod api;
mod state;

pub use state::*;
use tower::{BoxError, ServiceBuilder};
use tower_http::{
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
    LatencyUnit, ServiceBuilderExt,
};

/// The main http api application
pub struct HttpApi {
    srv: Option<JoinHandle<Result<()>>>,
    shutdown_tx: broadcast::Sender<()>,
    local_addr: SocketAddr,
}

impl HttpApi {
    /// The main api router
    pub fn router(state: HttpApiState) -> Router {
        let state = Arc::new(state);

        // Build our middleware stack
        let middleware = ServiceBuilder::new()
            .sensitive_request_headers(vec![header::AUTHORIZATION, header::COOKIE].into())
            .layer(
                TraceLayer::new_for_http()
                    .on_body_chunk(|chunk: &Bytes, latency: Duration, _: &tracing::Span| {
                        tracing::trace!(size_bytes = chunk.len(), latency = ?latency, "sending body chunk")
                    })
                    .make_span_with(DefaultMakeSpan::new().include_headers(true))
                    .on_response(DefaultOnResponse::new().include_headers(true).latency_unit(LatencyUnit::Micros)),
            )
            .layer(HandleErrorLayer::new(Self::handle_errors))
            .timeout(Duration::from_secs(180));

        Router::new()
            .nest("/api", api::router())
            .with_state(state)
            .layer(middleware)
    }

    /// Binds the http api server to the supplied address and starts
    /// serving requests
    pub async fn start(addr: SocketAddr, state: HttpApiState) -> Result<Self> {
        let shutdown_tx = state.shutdown_sender();
        let mut shutdown_rx = shutdown_tx.subscribe();

        let server = axum::Server::try_bind(&addr)
            .with_context(|| format!("Failed to bind http server to {}", addr))?
            .serve(Self::router(state).into_make_service());
        let local_addr = server.local_addr();

        info!("Listening on http://{}", local_addr);

        let server = server.with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
        });

        let srv = tokio::spawn(async move {
            if let Err(err) = server.await {
                error!("Http server error: {:?}", err);
                return Err(err).context("Http server error");
            }

            Ok(())
        });

        Ok(Self {
            srv: Some(srv),
            shutdown_tx,
            local_addr,
        })
    }

    /// The address the server is listening on
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Checks whether http server is running
    pub fn healthy(&self) -> bool {
        match &self.srv {
            Some(srv) => !srv.is_finished(),
            _ => false,
        }
    }

    async fn handle_errors(err: BoxError) -> impl IntoResponse {
        if err.is::<tower::timeout::error::Elapsed>() {
            (
                StatusCode::REQUEST_TIMEOUT,
                "Request took too long".to_string(),
            )
        } else {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Unhandled internal error: {}", err),
            )
        }
    }

    /// Signals open streams and the server to shut down, waiting for
    /// in-flight requests to complete
    pub async fn terminate(mut self) -> Result<()> {
        let srv = match self.srv.take() {
            Some(srv) => srv,
            None => return Ok(()),
        };

        if self.shutdown_tx.send(()).is_err() {
            warn!("Http server has already stopped");
        }

        srv.await.context("Failed to join http server task")?
    }
}
