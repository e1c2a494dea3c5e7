//! Syntactic validation for every identifier entering the registry.
//!
//! Pure functions, no I/O. The facade maps any failure to a
//! `bad_request` error carrying the message.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::ChannelInfo;

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?$").unwrap());

/// Validates a namespace, resource, or channel name.
///
/// Names may include lowercase letters, digits, and hyphens, must start
/// and end with an alphanumeric character, and must not exceed 63
/// characters.
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("name cannot be empty".to_string());
    }
    if name.len() > 63 {
        return Err("name cannot exceed 63 characters".to_string());
    }
    if !NAME_PATTERN.is_match(name) {
        return Err(
            "name must contain only lowercase letters, numbers, and hyphens, \
             and must start and end with an alphanumeric character"
                .to_string(),
        );
    }
    Ok(())
}

/// Validates a version string as a semantic version.
pub fn validate_version_string(version: &str) -> Result<(), String> {
    if semver::Version::parse(version).is_err() {
        return Err(
            "invalid version format: must be a semantic version (e.g., 1.2.3, 1.0.0-alpha.1)"
                .to_string(),
        );
    }
    Ok(())
}

pub fn validate_namespace(namespace: &str) -> Result<(), String> {
    validate_name(namespace)
}

/// Validates a resource identifier (namespace + resource).
pub fn validate_identifier(namespace: &str, resource: &str) -> Result<(), String> {
    validate_name(namespace)?;
    validate_name(resource)
}

/// Validates a version reference (namespace + resource + version).
pub fn validate_reference(namespace: &str, resource: &str, version: &str) -> Result<(), String> {
    validate_name(namespace)?;
    validate_name(resource)?;
    validate_version_string(version)
}

/// Validates a channel reference (namespace + resource + channel).
pub fn validate_channel_reference(
    namespace: &str,
    resource: &str,
    channel: &str,
) -> Result<(), String> {
    validate_name(namespace)?;
    validate_name(resource)?;
    validate_name(channel)
}

/// Validates channel info (name plus target version) in context.
pub fn validate_channel_info(
    namespace: &str,
    resource: &str,
    info: &ChannelInfo,
) -> Result<(), String> {
    validate_name(namespace)?;
    validate_name(resource)?;
    validate_name(&info.name)?;
    validate_version_string(&info.version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_names() {
        for name in ["a", "a1", "myorg", "my-org", "0abc", "a-b-c-1"] {
            assert!(validate_name(name).is_ok(), "{name}");
        }
        assert!(validate_name(&"a".repeat(63)).is_ok());
    }

    #[test]
    fn invalid_names() {
        for name in ["", "A", "my_org", "-abc", "abc-", "my org", "my.org"] {
            assert!(validate_name(name).is_err(), "{name:?}");
        }
        assert!(validate_name(&"a".repeat(64)).is_err());
    }

    #[test]
    fn valid_version_strings() {
        for version in ["0.0.1", "1.2.3", "1.0.0-alpha.1", "2.0.0+build.7"] {
            assert!(validate_version_string(version).is_ok(), "{version}");
        }
    }

    #[test]
    fn invalid_version_strings() {
        for version in ["", "1", "1.2", "v1.2.3", "1.2.3.4", "01.2.3"] {
            assert!(validate_version_string(version).is_err(), "{version:?}");
        }
    }

    #[test]
    fn compound_validators_short_circuit() {
        assert!(validate_identifier("Bad", "good").is_err());
        assert!(validate_identifier("good", "Bad").is_err());
        assert!(validate_reference("good", "good", "not-semver").is_err());
        assert!(validate_channel_reference("good", "good", "Bad").is_err());
    }

    #[test]
    fn channel_info_validates_name_and_version() {
        let ok = ChannelInfo {
            name: "stable".to_string(),
            version: "1.0.0".to_string(),
            description: String::new(),
        };
        assert!(validate_channel_info("myorg", "mywidget", &ok).is_ok());

        let bad_version = ChannelInfo {
            version: "latest".to_string(),
            ..ok.clone()
        };
        assert!(validate_channel_info("myorg", "mywidget", &bad_version).is_err());

        let bad_name = ChannelInfo {
            name: "Stable".to_string(),
            ..ok
        };
        assert!(validate_channel_info("myorg", "mywidget", &bad_name).is_err());
    }
}
