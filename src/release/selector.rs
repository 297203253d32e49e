//! Best-release selection.
//!
//! Walks every release of a snapshot and keeps the highest version that is
//! strictly newer than the client's, ships an asset for the client's
//! platform, and admits the client through its rollout rule.

use std::cmp::Ordering;

use semver::Version;

use crate::config::{ConfigSnapshot, Release};
use crate::release::rollout::{is_eligible, ClientIdentity};
use crate::release::version::{cmp_precedence, parse_version};

/// Error type for release selection.
#[derive(Debug, thiserror::Error)]
pub enum SelectError {
    /// The client's current version is not a semantic version.
    #[error("invalid current_version {input:?}: {source}")]
    InvalidVersion {
        input: String,
        #[source]
        source: semver::Error,
    },
}

/// Select the single best release for a client, or `None` if the client is up
/// to date or not eligible for anything newer.
pub fn select<'a>(
    snapshot: &'a ConfigSnapshot,
    platform: &str,
    current_version: &str,
    identity: &ClientIdentity,
) -> Result<Option<&'a Release>, SelectError> {
    let current = parse_version(current_version).map_err(|source| SelectError::InvalidVersion {
        input: current_version.to_string(),
        source,
    })?;

    let mut best: Option<(&Release, Version)> = None;

    for release in &snapshot.releases {
        let version = match parse_version(&release.version) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(
                    version = %release.version,
                    error = %e,
                    "Skipping release with invalid version"
                );
                continue;
            }
        };

        if cmp_precedence(&version, &current) != Ordering::Greater {
            continue;
        }

        if !release.platforms.contains_key(platform) {
            continue;
        }

        if !is_eligible(release.rollout.as_ref(), identity, &release.version) {
            continue;
        }

        let is_better = best
            .as_ref()
            .map_or(true, |(_, best_version)| cmp_precedence(&version, best_version) == Ordering::Greater);
        if is_better {
            best = Some((release, version));
        }
    }

    Ok(best.map(|(release, _)| release))
}
