//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::ConfigSnapshot;
use crate::config::validation::{invalid_release_versions, validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    ParseYaml(#[from] serde_yaml::Error),

    #[error("Parse error: {0}")]
    ParseToml(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Document format, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
}

impl ConfigFormat {
    /// `.toml` files are TOML; everything else is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Yaml,
        }
    }
}

/// Parse and validate a config document.
pub fn parse_config(content: &str, format: ConfigFormat) -> Result<ConfigSnapshot, LoadError> {
    let config: ConfigSnapshot = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(content)?,
        ConfigFormat::Toml => toml::from_str(content)?,
    };

    validate_config(&config).map_err(LoadError::Validation)?;
    report_invalid_versions(&config);

    Ok(config)
}

/// Log a warning for each release whose version cannot be parsed. Returns
/// how many were reported.
pub fn report_invalid_versions(config: &ConfigSnapshot) -> usize {
    let invalid = invalid_release_versions(config);
    for release in &invalid {
        tracing::warn!(
            index = release.index,
            version = %release.version,
            reason = %release.reason,
            "Release has an invalid version and will never be served"
        );
    }
    invalid.len()
}

/// Load and validate configuration from a YAML or TOML file.
pub fn load_config(path: &Path) -> Result<ConfigSnapshot, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_config(&content, ConfigFormat::from_path(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const YAML: &str = r#"
server:
  port: 9000
releases:
  - version: 1.2.0
    notes: Bug fixes
    pub_date: "2025-03-01T12:00:00Z"
    platforms:
      linux-x86_64:
        url: https://downloads.example.com/app-1.2.0.tar.gz
        signature: c2lnbmF0dXJl
    rollout:
      customers: [acme]
      regions: [eu-west]
      percentage: 10
"#;

    const TOML: &str = r#"
[server]
port = 9000

[[releases]]
version = "1.2.0"
notes = "Bug fixes"
pub_date = "2025-03-01T12:00:00Z"

[releases.platforms.linux-x86_64]
url = "https://downloads.example.com/app-1.2.0.tar.gz"
signature = "c2lnbmF0dXJl"

[releases.rollout]
customers = ["acme"]
regions = ["eu-west"]
percentage = 10
"#;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("a/config.toml")), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("config.TOML")), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("config.yaml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("config")), ConfigFormat::Yaml);
    }

    #[test]
    fn test_yaml_and_toml_agree() {
        let from_yaml = parse_config(YAML, ConfigFormat::Yaml).unwrap();
        let from_toml = parse_config(TOML, ConfigFormat::Toml).unwrap();
        assert_eq!(from_yaml, from_toml);
        assert_eq!(from_yaml.server.port, 9000);
        assert_eq!(from_yaml.releases[0].rollout.as_ref().unwrap().percentage, Some(10));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(YAML.as_bytes()).unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.releases.len(), 1);
        assert_eq!(config.releases[0].notes, "Bug fixes");
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/update-config.yaml")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_malformed_document() {
        let err = parse_config("releases: [version: {", ConfigFormat::Yaml).unwrap_err();
        assert!(matches!(err, LoadError::ParseYaml(_)));

        let err = parse_config("releases = 3", ConfigFormat::Toml).unwrap_err();
        assert!(matches!(err, LoadError::ParseToml(_)));
    }

    #[test]
    fn test_release_without_version_is_kept_out() {
        let yaml = r#"
releases:
  - notes: no version
  - version: 1.3.0
    platforms:
      linux-x86_64: { url: "https://downloads.example.com/1.3.0", signature: "s130" }
"#;
        let config = parse_config(yaml, ConfigFormat::Yaml).unwrap();
        assert_eq!(config.releases.len(), 2);
        assert_eq!(config.releases[0].version, "");
        assert_eq!(report_invalid_versions(&config), 1);

        let selected = crate::release::select(&config, "linux-x86_64", "1.0.0", &Default::default()).unwrap();
        assert_eq!(selected.map(|r| r.version.as_str()), Some("1.3.0"));
    }

    #[test]
    fn test_validation_failure() {
        let yaml = "releases:\n  - version: 1.0.0\n    rollout: { percentage: 101 }\n";
        let err = parse_config(yaml, ConfigFormat::Yaml).unwrap_err();
        assert!(matches!(err, LoadError::Validation(ref e) if e.len() == 1));
        assert!(err.to_string().contains("exceeds 100"));
    }
}
