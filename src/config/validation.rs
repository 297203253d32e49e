//! Configuration validation.
//!
//! Serde handles syntax; this module checks semantics before a snapshot is
//! accepted into the store:
//! - rollout percentages lie in 0..=100
//! - every platform asset has a url and a signature
//! - no two releases share a version for the same platform
//!
//! All errors are collected, not just the first. Releases whose version does
//! not parse are not errors: they are reported separately and simply never
//! selected.

use std::cmp::Ordering;

use crate::config::schema::{ConfigSnapshot, Release};
use crate::release::version::{cmp_precedence, parse_version};

/// A semantic problem that makes a config document unacceptable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("release {version}: rollout percentage {percentage} exceeds 100")]
    PercentageOutOfRange { version: String, percentage: u32 },

    #[error("release {version}: platform {platform} has an empty {field}")]
    EmptyAssetField {
        version: String,
        platform: String,
        field: &'static str,
    },

    #[error("duplicate release version {first} and {second} for platform {platform}")]
    DuplicateVersion {
        first: String,
        second: String,
        platform: String,
    },
}

/// A release entry whose version cannot take part in selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidReleaseVersion {
    /// Position in the `releases` list.
    pub index: usize,
    pub version: String,
    pub reason: String,
}

/// Validate a parsed config document.
pub fn validate_config(config: &ConfigSnapshot) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for release in &config.releases {
        if let Some(percentage) = release.rollout.as_ref().and_then(|r| r.percentage) {
            if percentage > 100 {
                errors.push(ValidationError::PercentageOutOfRange {
                    version: release.version.clone(),
                    percentage,
                });
            }
        }

        for (platform, asset) in &release.platforms {
            for (field, value) in [("url", &asset.url), ("signature", &asset.signature)] {
                if value.trim().is_empty() {
                    errors.push(ValidationError::EmptyAssetField {
                        version: release.version.clone(),
                        platform: platform.clone(),
                        field,
                    });
                }
            }
        }
    }

    // Equal versions are fine as long as they serve disjoint platforms.
    let parsed: Vec<(semver::Version, &Release)> = config
        .releases
        .iter()
        .filter_map(|r| parse_version(&r.version).ok().map(|v| (v, r)))
        .collect();
    for (i, (version, first)) in parsed.iter().enumerate() {
        for (other, second) in &parsed[i + 1..] {
            if cmp_precedence(version, other) != Ordering::Equal {
                continue;
            }
            if let Some(platform) = first.platforms.keys().find(|p| second.platforms.contains_key(*p)) {
                errors.push(ValidationError::DuplicateVersion {
                    first: first.version.clone(),
                    second: second.version.clone(),
                    platform: platform.clone(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// List the releases that will be excluded because their version is invalid.
pub fn invalid_release_versions(config: &ConfigSnapshot) -> Vec<InvalidReleaseVersion> {
    config
        .releases
        .iter()
        .enumerate()
        .filter_map(|(index, release)| {
            parse_version(&release.version)
                .err()
                .map(|e| InvalidReleaseVersion {
                    index,
                    version: release.version.clone(),
                    reason: e.to_string(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> ConfigSnapshot {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_valid_config() {
        let config = parse(
            r#"
releases:
  - version: 1.0.0
    platforms:
      linux-x86_64: { url: "https://a", signature: "s" }
    rollout: { percentage: 100 }
  - version: 1.1.0
    platforms:
      linux-x86_64: { url: "https://b", signature: "s" }
"#,
        );
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let config = parse(
            r#"
releases:
  - version: 1.0.0
    platforms:
      linux-x86_64: { url: "", signature: "" }
    rollout: { percentage: 150 }
"#,
        );
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::PercentageOutOfRange {
            version: "1.0.0".into(),
            percentage: 150,
        }));
    }

    #[test]
    fn test_duplicate_versions_rejected() {
        let config = parse(
            r#"
releases:
  - version: 1.2.0
    platforms:
      linux-x86_64: { url: "https://a", signature: "s" }
  - version: 1.3.0
    platforms:
      linux-x86_64: { url: "https://b", signature: "s" }
  - version: v1.2
    platforms:
      linux-x86_64: { url: "https://c", signature: "s" }
      windows-x86_64: { url: "https://d", signature: "s" }
"#,
        );
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::DuplicateVersion {
                first: "1.2.0".into(),
                second: "v1.2".into(),
                platform: "linux-x86_64".into(),
            }]
        );
    }

    #[test]
    fn test_same_version_on_disjoint_platforms() {
        let config = parse(
            r#"
releases:
  - version: 1.2.0
    platforms:
      linux-x86_64: { url: "https://a", signature: "s" }
  - version: 1.2.0
    platforms:
      windows-x86_64: { url: "https://b", signature: "s" }
"#,
        );
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn test_invalid_versions_are_not_errors() {
        let config = parse(
            r#"
releases:
  - version: banana
  - version: 1.0.0
"#,
        );
        assert_eq!(validate_config(&config), Ok(()));
        let invalid = invalid_release_versions(&config);
        assert_eq!(invalid.len(), 1);
        assert_eq!(invalid[0].index, 0);
        assert_eq!(invalid[0].version, "banana");
    }
}
