//! Request handling.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) unless the client sent one
//! - Extract the client identity headers used by rollout rules

use axum::http::{HeaderMap, HeaderName, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::release::ClientIdentity;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Customer id matched against `rollout.customers`.
pub const X_CUSTOMER: HeaderName = HeaderName::from_static("x-customer");

/// Region id matched against `rollout.regions`.
pub const X_REGION: HeaderName = HeaderName::from_static("x-region");

/// Stable machine id hashed into the percentage bucket.
pub const X_MACHINE_ID: HeaderName = HeaderName::from_static("x-machine-id");

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        Uuid::new_v4().to_string().parse().ok().map(RequestId::new)
    }
}

fn header_str(headers: &HeaderMap, name: &HeaderName) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Client identity from request headers. Missing or non-ASCII headers become
/// empty strings, which never match an allow-list.
pub fn client_identity(headers: &HeaderMap) -> ClientIdentity {
    ClientIdentity {
        customer: header_str(headers, &X_CUSTOMER),
        region: header_str(headers, &X_REGION),
        machine_id: header_str(headers, &X_MACHINE_ID),
    }
}

/// Request ID of an incoming request, for log correlation.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}
