//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! GET /update/{target}-{arch}/{current_version}
//!     → server.rs (Axum router, request ID, tracing, timeout)
//!     → request.rs (identity headers → ClientIdentity)
//!     → service.rs (UpdateService → release::select)
//!     → response.rs (200 JSON | 204 | 400)
//! ```

pub mod request;
pub mod response;
pub mod server;
pub mod service;

pub use request::{client_identity, MakeRequestUuidV4, X_REQUEST_ID};
pub use response::{HealthStatus, UpdateResponse};
pub use server::UpdateServer;
pub use service::{ServiceError, UpdateOutcome, UpdateRequest, UpdateService};
