//! Post-merge configuration validation.
//!
//! Validates that deserialized [`Config`](crate::Config) values are within
//! acceptable ranges and that cross-field invariants hold.

use std::path::{Component, Path};

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

/// Validate a fully merged and deserialized configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_protocol(config)?;
    validate_deep_link(config)?;
    validate_logging(config)?;
    Ok(())
}

/// Upper bound on the readiness wait (one day).
const MAX_READY_TIMEOUT_SECS: u64 = 86_400;

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.to_owned(),
        message: message.into(),
    }
}

/// RFC 3986: `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`.
fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn validate_protocol(config: &Config) -> ConfigResult<()> {
    let p = &config.protocol;

    if !is_valid_scheme(&p.scheme) {
        return Err(invalid(
            "protocol.scheme",
            format!("'{}' is not a valid URI scheme", p.scheme),
        ));
    }

    if matches!(p.scheme.to_ascii_lowercase().as_str(), "file" | "http" | "https") {
        return Err(invalid(
            "protocol.scheme",
            format!("'{}' is a built-in scheme and cannot serve bundles", p.scheme),
        ));
    }

    let index = Path::new(&p.index_document);
    let single_name = matches!(
        index.components().collect::<Vec<_>>().as_slice(),
        [Component::Normal(_)]
    );
    if !single_name || p.index_document.contains(['/', '\\']) {
        return Err(invalid(
            "protocol.index_document",
            "must be a single file name without separators",
        ));
    }

    if let Some(dir) = &p.install_dir
        && !dir.is_absolute()
    {
        return Err(invalid(
            "protocol.install_dir",
            format!("'{}' must be an absolute path", dir.display()),
        ));
    }

    for (field, root) in p.roots.entries() {
        validate_root_dir(field, root)?;
    }

    Ok(())
}

fn validate_root_dir(field: &str, dir: &Path) -> ConfigResult<()> {
    if dir.as_os_str().is_empty() {
        return Err(invalid(field, "must not be empty"));
    }
    if dir.is_absolute() || dir.has_root() {
        return Err(invalid(
            field,
            "must be relative to protocol.install_dir",
        ));
    }
    if dir
        .components()
        .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
    {
        return Err(invalid(field, "must not contain '..' or a drive prefix"));
    }
    Ok(())
}

fn validate_deep_link(config: &Config) -> ConfigResult<()> {
    let d = &config.deep_link;

    if !is_valid_scheme(&d.scheme) {
        return Err(invalid(
            "deep_link.scheme",
            format!("'{}' is not a valid URI scheme", d.scheme),
        ));
    }

    if d.scheme.eq_ignore_ascii_case(&config.protocol.scheme) {
        return Err(invalid(
            "deep_link.scheme",
            "must differ from protocol.scheme",
        ));
    }

    if d.ready_timeout_secs > MAX_READY_TIMEOUT_SECS {
        return Err(invalid(
            "deep_link.ready_timeout_secs",
            format!("must be at most {MAX_READY_TIMEOUT_SECS} (0 waits indefinitely)"),
        ));
    }

    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    let l = &config.logging;

    if !matches!(
        l.level.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error" | "off"
    ) {
        return Err(invalid(
            "logging.level",
            format!(
                "unknown level '{}'; expected one of: trace, debug, info, warn, error, off",
                l.level
            ),
        ));
    }

    if !matches!(
        l.format.to_ascii_lowercase().as_str(),
        "pretty" | "compact" | "json" | "full"
    ) {
        return Err(invalid(
            "logging.format",
            format!(
                "unknown format '{}'; expected one of: pretty, compact, json, full",
                l.format
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn field_of(result: ConfigResult<()>) -> String {
        match result {
            Err(ConfigError::ValidationError { field, .. }) => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_scheme_syntax() {
        assert!(is_valid_scheme("app"));
        assert!(is_valid_scheme("x-cadence+v1.2"));
        assert!(!is_valid_scheme(""));
        assert!(!is_valid_scheme("1app"));
        assert!(!is_valid_scheme("app://"));
    }

    #[test]
    fn test_builtin_scheme_rejected() {
        let mut config = Config::default();
        config.protocol.scheme = "FILE".to_owned();
        assert_eq!(field_of(validate(&config)), "protocol.scheme");
    }

    #[test]
    fn test_schemes_must_differ() {
        let mut config = Config::default();
        config.deep_link.scheme = "App".to_owned();
        assert_eq!(field_of(validate(&config)), "deep_link.scheme");
    }

    #[test]
    fn test_index_document_must_be_plain_name() {
        let mut config = Config::default();
        config.protocol.index_document = "../index.html".to_owned();
        assert_eq!(field_of(validate(&config)), "protocol.index_document");

        config.protocol.index_document = "sub/index.html".to_owned();
        assert_eq!(field_of(validate(&config)), "protocol.index_document");
    }

    #[test]
    fn test_root_dirs_must_stay_relative() {
        let mut config = Config::default();
        config.protocol.roots.settings = PathBuf::from("/etc");
        assert_eq!(field_of(validate(&config)), "protocol.roots.settings");

        let mut config = Config::default();
        config.protocol.roots.assets = PathBuf::from("ui/../../shared");
        assert_eq!(field_of(validate(&config)), "protocol.roots.assets");
    }

    #[test]
    fn test_install_dir_must_be_absolute() {
        let mut config = Config::default();
        config.protocol.install_dir = Some(PathBuf::from("relative/dir"));
        assert_eq!(field_of(validate(&config)), "protocol.install_dir");
    }

    #[test]
    fn test_timeout_upper_bound() {
        let mut config = Config::default();
        config.deep_link.ready_timeout_secs = 0;
        assert!(validate(&config).is_ok());
        config.deep_link.ready_timeout_secs = MAX_READY_TIMEOUT_SECS.saturating_add(1);
        assert_eq!(field_of(validate(&config)), "deep_link.ready_timeout_secs");
    }

    #[test]
    fn test_logging_values() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_owned();
        assert_eq!(field_of(validate(&config)), "logging.level");

        let mut config = Config::default();
        config.logging.format = "xml".to_owned();
        assert_eq!(field_of(validate(&config)), "logging.format");
    }
}
