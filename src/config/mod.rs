//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (YAML/TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ConfigSnapshot (validated, immutable)
//!     → store.rs (Arc<ConfigSnapshot> behind ArcSwap)
//!
//! On file change (watcher.rs) or SIGHUP:
//!     → ConfigStore::reload
//!     → loader.rs loads + validates, outside any lock
//!     → atomic swap of Arc<ConfigSnapshot>
//!     → next request observes the new snapshot
//! ```
//!
//! # Design Decisions
//! - Snapshots are immutable once loaded; changes require a full reload
//! - A failed reload leaves the previous snapshot authoritative
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod store;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, report_invalid_versions, LoadError};
pub use schema::{ConfigSnapshot, ObservabilityConfig, PlatformAsset, Release, RolloutRule, ServerSettings};
pub use store::ConfigStore;
pub use validation::ValidationError;
pub use watcher::{ConfigWatcher, WatchError};
