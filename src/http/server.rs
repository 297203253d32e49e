//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout)
//! - Serve on a listener until shutdown

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ConfigStore;
use crate::http::request::{client_identity, request_id, MakeRequestUuidV4};
use crate::http::response::HealthStatus;
use crate::http::service::{ServiceError, UpdateOutcome, UpdateRequest, UpdateService};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: UpdateService,
}

/// HTTP server for the update endpoint.
pub struct UpdateServer {
    router: Router,
}

impl UpdateServer {
    /// Create a server answering from `store`.
    ///
    /// The request timeout is read from the snapshot current at construction.
    pub fn new(store: Arc<ConfigStore>) -> Self {
        let timeout = Duration::from_secs(store.get().server.request_timeout_secs.max(1));
        let state = AppState {
            service: UpdateService::new(store),
        };
        Self {
            router: Self::build_router(state, timeout),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState, timeout: Duration) -> Router {
        let routes = Router::new()
            .route("/update/{platform}/{*current_version}", get(check_update))
            .route("/health", get(health))
            .fallback(fallback)
            .with_state(state);
        with_middleware(routes, timeout)
    }

    /// The fully layered router, for serving or for in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(Shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Request ID layers wrap the timeout, so timed-out responses carry an ID too.
#[allow(deprecated)]
fn with_middleware(router: Router, timeout: Duration) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(timeout)),
    )
}

/// `GET /update/{target}-{arch}/{current_version}`
async fn check_update(
    State(state): State<AppState>,
    Path((platform, current_version)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    let start = Instant::now();
    let request_id = request_id(&headers);
    let request = UpdateRequest {
        platform,
        current_version,
        identity: client_identity(&headers),
    };

    match state.service.check(&request) {
        Ok(outcome) => {
            let (label, selected) = match &outcome {
                UpdateOutcome::Available(body) => ("update", Some(body.version.as_str())),
                UpdateOutcome::NoUpdate => ("no_update", None),
            };
            tracing::debug!(
                request_id = %request_id,
                platform = %request.platform,
                current_version = %request.current_version,
                machine_id = %request.identity.machine_id,
                selected = ?selected,
                "Update check resolved"
            );
            metrics::record_update_check(label, start);
            outcome.into_response()
        }
        Err(e) => {
            tracing::warn!(
                request_id = %request_id,
                platform = %request.platform,
                current_version = %request.current_version,
                error = %e,
                "Rejected update check"
            );
            metrics::record_update_check("bad_request", start);
            e.into_response()
        }
    }
}

/// `GET /health`
async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    let store = state.service.store();
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        releases: store.get().releases.len(),
        generation: store.generation(),
    })
}

/// Anything under `/update` that did not match the full route is malformed.
async fn fallback(uri: Uri) -> Response {
    let path = uri.path();
    if path == "/update" || path.starts_with("/update/") {
        metrics::record_update_check("bad_request", Instant::now());
        ServiceError::MalformedRequest.into_response()
    } else {
        (StatusCode::NOT_FOUND, "Not found").into_response()
    }
}
