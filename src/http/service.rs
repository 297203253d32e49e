//! Boundary mapping between the update endpoint and release selection.

use std::sync::Arc;

use crate::config::ConfigStore;
use crate::http::response::UpdateResponse;
use crate::release::{select, ClientIdentity, SelectError};

/// An update check as received from a client.
#[derive(Debug, Clone, Default)]
pub struct UpdateRequest {
    /// `{target}-{arch}`, e.g. `darwin-aarch64`.
    pub platform: String,
    pub current_version: String,
    pub identity: ClientIdentity,
}

/// Result of a successful update check.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    Available(UpdateResponse),
    NoUpdate,
}

/// Client errors. No release lookup happens when one of these is returned.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("path must be /update/{{target}}-{{arch}}/{{current_version}}")]
    MalformedRequest,

    #[error("invalid current_version: {0}")]
    InvalidVersion(String),
}

impl From<SelectError> for ServiceError {
    fn from(err: SelectError) -> Self {
        match err {
            SelectError::InvalidVersion { source, .. } => ServiceError::InvalidVersion(source.to_string()),
        }
    }
}

/// Resolves update checks against the current config snapshot.
#[derive(Debug, Clone)]
pub struct UpdateService {
    store: Arc<ConfigStore>,
}

impl UpdateService {
    pub fn new(store: Arc<ConfigStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<ConfigStore> {
        &self.store
    }

    /// Answer one update check.
    pub fn check(&self, request: &UpdateRequest) -> Result<UpdateOutcome, ServiceError> {
        let platform = request.platform.trim();
        let current_version = request.current_version.trim();
        if platform.is_empty() || current_version.is_empty() {
            return Err(ServiceError::MalformedRequest);
        }

        let snapshot = self.store.get();
        let selected = select(&snapshot, platform, current_version, &request.identity)?;

        let outcome = selected
            .and_then(|release| {
                release
                    .platforms
                    .get(platform)
                    .map(|asset| UpdateResponse::new(release, asset))
            })
            .map_or(UpdateOutcome::NoUpdate, UpdateOutcome::Available);
        Ok(outcome)
    }
}
