//! Update server for desktop application clients.
//!
//! Answers "is there a newer release for me?" by selecting, from an
//! in-memory config snapshot, the highest release a client is eligible for.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod release;

pub use config::{ConfigSnapshot, ConfigStore};
pub use http::UpdateServer;
pub use lifecycle::Shutdown;
