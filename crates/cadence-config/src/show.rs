//! The resolved configuration and how `config show` renders it.

use serde::Serialize;

use crate::merge::FieldSources;
use crate::types::Config;

/// A fully loaded configuration together with where each value came from.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The merged, validated configuration.
    pub config: Config,
    /// Layer that set each dotted field path.
    pub field_sources: FieldSources,
    /// Config files that were found and merged, in load order.
    pub loaded_files: Vec<String>,
}

/// Output format for `config show`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShowFormat {
    /// TOML, as it would appear in a config file.
    #[default]
    Toml,
    /// Pretty-printed JSON.
    Json,
}

impl std::str::FromStr for ShowFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown format '{other}'; expected toml or json")),
        }
    }
}

#[derive(Serialize)]
struct Annotated<'a> {
    config: &'a Config,
    loaded_files: &'a [String],
    sources: std::collections::BTreeMap<&'a str, String>,
}

impl ResolvedConfig {
    /// Render the configuration in the requested format.
    ///
    /// # Errors
    ///
    /// Returns the serializer's message if rendering fails.
    pub fn render(&self, format: ShowFormat) -> Result<String, String> {
        match format {
            ShowFormat::Toml => toml::to_string_pretty(&self.config).map_err(|e| e.to_string()),
            ShowFormat::Json => {
                let annotated = Annotated {
                    config: &self.config,
                    loaded_files: &self.loaded_files,
                    sources: self
                        .field_sources
                        .iter()
                        .map(|(k, v)| (k.as_str(), v.to_string()))
                        .collect(),
                };
                serde_json::to_string_pretty(&annotated).map_err(|e| e.to_string())
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_format_parses_case_insensitively() {
        assert_eq!("TOML".parse::<ShowFormat>(), Ok(ShowFormat::Toml));
        assert_eq!("json".parse::<ShowFormat>(), Ok(ShowFormat::Json));
        assert!("yaml".parse::<ShowFormat>().is_err());
    }

    #[test]
    fn render_toml_contains_sections() {
        let resolved = ResolvedConfig {
            config: Config::default(),
            field_sources: FieldSources::new(),
            loaded_files: Vec::new(),
        };
        let out = resolved.render(ShowFormat::Toml).unwrap();
        assert!(out.contains("[protocol]"));
        assert!(out.contains("[deep_link]"));
    }
}
