//! Locating and layering config files.
//!
//! Layers, lowest precedence first: the embedded `defaults.toml`, the system
//! file, the user file, then `CADENCE_*` environment fallbacks for anything
//! no file set. The merged tree is deserialized once and validated.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::env::{apply_env_fallbacks, collect_env_vars};
use crate::error::{ConfigError, ConfigResult};
use crate::merge::{ConfigLayer, FieldSources, deep_merge_tracking, record_leaves};
use crate::show::ResolvedConfig;
use crate::types::Config;
use crate::validate;

const DEFAULTS_TOML: &str = include_str!("defaults.toml");

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/cadence/config.toml";

/// Config files larger than this (1 MiB) are refused.
const MAX_CONFIG_FILE_SIZE: u64 = 1_048_576;

/// Run the full layered load.
///
/// `config_dir_override` stands in for the platform user configuration
/// directory, the one holding `config.toml`.
///
/// # Errors
///
/// Fails when a present file is unreadable or malformed, or when the merged
/// result does not validate.
pub fn load(config_dir_override: Option<&Path>) -> ConfigResult<ResolvedConfig> {
    let user_dir = match config_dir_override {
        Some(dir) => dir.to_path_buf(),
        None => user_config_dir()?,
    };
    load_from(
        Path::new(SYSTEM_CONFIG_PATH),
        Some(&user_dir),
        &collect_env_vars(),
    )
}

fn load_from(
    system_path: &Path,
    user_dir: Option<&Path>,
    env_vars: &HashMap<String, String>,
) -> ConfigResult<ResolvedConfig> {
    let mut merged: toml::Value = toml::from_str(DEFAULTS_TOML)
        .map_err(|e| parse_error("<embedded defaults>", e))?;
    let mut field_sources = FieldSources::new();
    record_leaves(&merged, "", ConfigLayer::Defaults, &mut field_sources);

    let user_path = user_dir.map(|dir| dir.join("config.toml"));
    let file_layers = [
        Some((ConfigLayer::System, system_path.to_path_buf())),
        user_path.map(|path| (ConfigLayer::User, path)),
    ];

    let mut loaded_files = Vec::new();
    for (layer, path) in file_layers.into_iter().flatten() {
        let Some(overlay) = try_load_file(&path)? else {
            continue;
        };
        deep_merge_tracking(&mut merged, &overlay, "", layer, &mut field_sources);
        info!(path = %path.display(), %layer, "merged config file");
        loaded_files.push(path.display().to_string());
    }

    let from_env = apply_env_fallbacks(&mut merged, &mut field_sources, env_vars);
    if from_env > 0 {
        debug!(fields = from_env, "filled fields from the environment");
    }

    let config = into_config(merged, "<merged config>")?;
    Ok(ResolvedConfig {
        config,
        field_sources,
        loaded_files,
    })
}

/// Read, deserialize and validate one file on its own, with no layering.
///
/// # Errors
///
/// Fails when the file is missing, unreadable, malformed or invalid.
pub fn load_file(path: &Path) -> ConfigResult<Config> {
    match try_load_file(path)? {
        Some(value) => into_config(value, &path.display().to_string()),
        None => Err(read_error(
            path,
            std::io::Error::from(std::io::ErrorKind::NotFound),
        )),
    }
}

fn into_config(value: toml::Value, origin: &str) -> ConfigResult<Config> {
    let config: Config = value
        .try_into()
        .map_err(|e: toml::de::Error| parse_error(origin, e))?;
    validate::validate(&config)?;
    Ok(config)
}

/// Parse `path` as TOML. A missing file is `Ok(None)`; the single read
/// leaves no window between an existence check and the read.
fn try_load_file(path: &Path) -> ConfigResult<Option<toml::Value>> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file here");
            return Ok(None);
        },
        Err(e) => return Err(read_error(path, e)),
    };

    let size = u64::try_from(text.len()).unwrap_or(u64::MAX);
    if size > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::ValidationError {
            field: path.display().to_string(),
            message: format!("file is {size} bytes; the limit is {MAX_CONFIG_FILE_SIZE}"),
        });
    }

    toml::from_str(&text)
        .map(Some)
        .map_err(|e| parse_error(&path.display().to_string(), e))
}

fn parse_error(origin: &str, source: toml::de::Error) -> ConfigError {
    ConfigError::ParseError {
        path: origin.to_owned(),
        source,
    }
}

fn read_error(path: &Path, source: std::io::Error) -> ConfigError {
    ConfigError::ReadError {
        path: path.display().to_string(),
        source,
    }
}

/// Where the user config file lives on this platform.
///
/// # Errors
///
/// Returns [`ConfigError::NoConfigDir`] when no home directory is known.
pub fn user_config_dir() -> ConfigResult<PathBuf> {
    directories::ProjectDirs::from("org", "cadence", "cadence")
        .map(|d| d.config_dir().to_path_buf())
        .ok_or(ConfigError::NoConfigDir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_deserialize_to_config() {
        let config: Config = toml::from_str(DEFAULTS_TOML).unwrap();
        assert_eq!(config.protocol.scheme, "app");
        assert_eq!(config.protocol.index_document, "index.html");
        assert_eq!(config.deep_link.scheme, "cadence");
        assert_eq!(config.deep_link.ready_timeout_secs, 30);
        assert!(config.protocol.install_dir.is_none());
    }

    #[test]
    fn test_defaults_match_struct_defaults() {
        let from_toml: Config = toml::from_str(DEFAULTS_TOML).unwrap();
        let from_code = Config::default();
        assert_eq!(from_toml.protocol.roots, from_code.protocol.roots);
        assert_eq!(from_toml.logging.format, from_code.logging.format);
    }

    #[test]
    fn test_layers_apply_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let system = dir.path().join("system.toml");
        std::fs::write(
            &system,
            "[protocol]\nscheme = \"sys\"\n[logging]\nlevel = \"warn\"\n",
        )
        .unwrap();
        let user_dir = dir.path().join("user");
        std::fs::create_dir(&user_dir).unwrap();
        std::fs::write(user_dir.join("config.toml"), "[protocol]\nscheme = \"usr\"\n").unwrap();

        let resolved = load_from(&system, Some(&user_dir), &HashMap::new()).unwrap();

        assert_eq!(resolved.config.protocol.scheme, "usr");
        assert_eq!(resolved.config.logging.level, "warn");
        assert_eq!(resolved.loaded_files.len(), 2);
        assert_eq!(
            resolved.field_sources.get("protocol.scheme"),
            Some(&ConfigLayer::User)
        );
        assert_eq!(
            resolved.field_sources.get("logging.level"),
            Some(&ConfigLayer::System)
        );
    }

    #[test]
    fn test_env_fallback_after_files() {
        let dir = tempfile::tempdir().unwrap();
        let env = HashMap::from([("CADENCE_INSTALL_DIR".to_owned(), "/opt/cadence".to_owned())]);

        let resolved =
            load_from(&dir.path().join("missing.toml"), Some(dir.path()), &env).unwrap();

        assert_eq!(
            resolved.config.protocol.install_dir,
            Some(PathBuf::from("/opt/cadence"))
        );
    }

    #[test]
    fn test_invalid_layer_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "[protocol.roots]\nmain = \"../outside\"\n",
        )
        .unwrap();

        let result = load_from(&dir.path().join("none.toml"), Some(dir.path()), &HashMap::new());
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn test_missing_single_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_file(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[protocol\nscheme = ").unwrap();

        assert!(matches!(
            load_file(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_file_over_size_limit_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.toml");
        let padding = "#".repeat(usize::try_from(MAX_CONFIG_FILE_SIZE).unwrap().saturating_add(1));
        std::fs::write(&path, padding).unwrap();

        let result = try_load_file(&path);
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })), "{result:?}");
    }

    #[test]
    fn test_missing_files_leave_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = load_from(&dir.path().join("none.toml"), None, &HashMap::new()).unwrap();
        assert!(resolved.loaded_files.is_empty());
        assert_eq!(resolved.config.protocol.scheme, "app");
        assert_eq!(
            resolved.field_sources.get("protocol.scheme"),
            Some(&ConfigLayer::Defaults)
        );
    }
}
