//! Semantic version parsing and ordering.
//!
//! Clients and config authors both write shorthand versions (`v1.2`), so
//! parsing pads missing core segments before handing off to [`semver`].
//! Ordering follows SemVer precedence: build metadata is ignored.

use std::cmp::Ordering;

use semver::Version;

/// Parse a version string, tolerating a leading `v` and omitted minor/patch.
pub fn parse_version(input: &str) -> Result<Version, semver::Error> {
    let trimmed = input.trim();
    let unprefixed = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);

    match Version::parse(unprefixed) {
        Ok(version) => Ok(version),
        Err(original_err) => {
            let (core, suffix) = split_core_suffix(unprefixed);
            let mut segments: Vec<&str> = core.split('.').collect();
            if segments.is_empty() || segments.len() > 3 || segments.iter().any(|s| s.is_empty()) {
                return Err(original_err);
            }
            while segments.len() < 3 {
                segments.push("0");
            }
            let normalized = format!("{}{}", segments.join("."), suffix);
            Version::parse(&normalized).map_err(|_| original_err)
        }
    }
}

fn split_core_suffix(input: &str) -> (&str, &str) {
    match input.find(['-', '+']) {
        Some(idx) => (&input[..idx], &input[idx..]),
        None => (input, ""),
    }
}

/// Compare two versions by SemVer precedence.
pub fn cmp_precedence(a: &Version, b: &Version) -> Ordering {
    (a.major, a.minor, a.patch)
        .cmp(&(b.major, b.minor, b.patch))
        .then_with(|| a.pre.cmp(&b.pre))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_versions() {
        let v = parse_version("1.2.3").unwrap();
        assert_eq!((v.major, v.minor, v.patch), (1, 2, 3));
        assert_eq!(parse_version("2.0.0-beta.1").unwrap().pre.as_str(), "beta.1");
    }

    #[test]
    fn test_shorthand_versions() {
        assert_eq!(parse_version("v1.2").unwrap(), Version::new(1, 2, 0));
        assert_eq!(parse_version("3").unwrap(), Version::new(3, 0, 0));
        assert_eq!(parse_version("1.4-rc.1").unwrap().to_string(), "1.4.0-rc.1");
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_version("abc").is_err());
        assert!(parse_version("").is_err());
        assert!(parse_version("1..2").is_err());
        assert!(parse_version("1.2.3.4").is_err());
    }

    #[test]
    fn test_precedence_order() {
        let cmp = |a: &str, b: &str| {
            cmp_precedence(&parse_version(a).unwrap(), &parse_version(b).unwrap())
        };
        assert_eq!(cmp("1.10.0", "1.9.0"), Ordering::Greater);
        assert_eq!(cmp("2.0.0-rc.1", "2.0.0"), Ordering::Less);
        assert_eq!(cmp("2.0.0-alpha", "2.0.0-beta"), Ordering::Less);
        assert_eq!(cmp("1.0.0+build.1", "1.0.0+build.2"), Ordering::Equal);
    }
}
