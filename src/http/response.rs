//! Response mapping.
//!
//! - update available → 200 with the Tauri updater JSON body
//! - no update → 204, empty body
//! - client error → 400 with a plain-text message

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::config::{PlatformAsset, Release};
use crate::http::service::{ServiceError, UpdateOutcome};

/// Body returned when an update is available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub version: String,
    pub notes: String,
    pub pub_date: String,
    pub url: String,
    pub signature: String,
}

impl UpdateResponse {
    pub fn new(release: &Release, asset: &PlatformAsset) -> Self {
        Self {
            version: release.version.clone(),
            notes: release.notes.clone(),
            pub_date: release.pub_date.clone(),
            url: asset.url.clone(),
            signature: asset.signature.clone(),
        }
    }
}

impl IntoResponse for UpdateOutcome {
    fn into_response(self) -> Response {
        match self {
            UpdateOutcome::Available(body) => (StatusCode::OK, Json(body)).into_response(),
            UpdateOutcome::NoUpdate => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, self.to_string()).into_response()
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub releases: usize,
    pub generation: u64,
}
