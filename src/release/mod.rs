//! Release resolution subsystem.
//!
//! # Data Flow
//! ```text
//! ConfigSnapshot (from ConfigStore)
//!     → selector.rs (walk releases, keep highest eligible)
//!         → version.rs (semver parse + precedence)
//!         → rollout.rs (allow-lists + percentage bucket)
//!     → Option<&Release>
//! ```
//!
//! Everything here is pure computation over an already-loaded snapshot.

pub mod rollout;
pub mod selector;
pub mod version;

pub use rollout::{bucket, is_eligible, ClientIdentity};
pub use selector::{select, SelectError};
pub use version::parse_version;
