//! Environment variable fallbacks.
//!
//! Environment variables only fill fields that no config file set; a value
//! written in a file always wins.

use std::collections::HashMap;

use tracing::warn;

use crate::merge::{ConfigLayer, FieldSources};

/// How an environment string is converted into a TOML value.
#[derive(Debug, Clone, Copy)]
enum EnvKind {
    Str,
    Integer,
}

/// Environment variable → dotted config path mapping.
const ENV_FALLBACKS: &[(&str, &str, EnvKind)] = &[
    ("CADENCE_INSTALL_DIR", "protocol.install_dir", EnvKind::Str),
    ("CADENCE_LOG_LEVEL", "logging.level", EnvKind::Str),
    ("CADENCE_LOG_DIR", "logging.directory", EnvKind::Str),
    (
        "CADENCE_READY_TIMEOUT_SECS",
        "deep_link.ready_timeout_secs",
        EnvKind::Integer,
    ),
];

/// Snapshot the `CADENCE_*` variables of the current process.
#[must_use]
pub fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars()
        .filter(|(k, _)| k.starts_with("CADENCE_"))
        .collect()
}

/// Apply fallbacks for fields still at their default. Returns the number of
/// fields set from the environment.
pub fn apply_env_fallbacks(
    merged: &mut toml::Value,
    sources: &mut FieldSources,
    env_vars: &HashMap<String, String>,
) -> usize {
    let mut applied = 0usize;

    for (var, path, kind) in ENV_FALLBACKS {
        let Some(raw) = env_vars.get(*var) else {
            continue;
        };
        if raw.is_empty() {
            continue;
        }
        let set_by_file = sources
            .get(*path)
            .is_some_and(|layer| !matches!(layer, ConfigLayer::Defaults));
        if set_by_file {
            continue;
        }

        let value = match kind {
            EnvKind::Str => toml::Value::String(raw.clone()),
            EnvKind::Integer => match raw.parse::<i64>() {
                Ok(n) => toml::Value::Integer(n),
                Err(_) => {
                    warn!(var = *var, value = %raw, "ignoring non-numeric environment override");
                    continue;
                },
            },
        };

        if set_path(merged, path, value) {
            sources.insert((*path).to_owned(), ConfigLayer::Environment);
            applied = applied.saturating_add(1);
        }
    }

    applied
}

/// Write `value` at a dotted path, creating intermediate tables.
fn set_path(root: &mut toml::Value, path: &str, value: toml::Value) -> bool {
    let mut segments: Vec<&str> = path.split('.').collect();
    let Some(leaf) = segments.pop() else {
        return false;
    };

    let mut cursor = root;
    for segment in segments {
        let toml::Value::Table(table) = cursor else {
            return false;
        };
        cursor = table
            .entry(segment.to_owned())
            .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
    }

    match cursor {
        toml::Value::Table(table) => {
            table.insert(leaf.to_owned(), value);
            true
        },
        _ => false,
    }
}
