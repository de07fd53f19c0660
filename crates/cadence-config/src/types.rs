//! Configuration types for the Cadence client.
//!
//! All types in this module are self-contained. Every struct implements
//! [`Default`] with production defaults so that a bare `[section]` header in
//! TOML produces a working configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root configuration for the Cadence client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Internal asset scheme and bundle roots.
    pub protocol: ProtocolSection,
    /// External deep-link scheme handling.
    pub deep_link: DeepLinkSection,
    /// Logging level, format, and per-crate directives.
    pub logging: LoggingSection,
}

// ---------------------------------------------------------------------------
// ProtocolSection
// ---------------------------------------------------------------------------

/// Settings for the internal scheme that serves bundled UI assets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolSection {
    /// Scheme name the UI bundles are served over (`app` → `app://main/`).
    pub scheme: String,
    /// Installation directory the bundle roots are relative to. When unset,
    /// the directory containing the running executable is used.
    pub install_dir: Option<PathBuf>,
    /// Document served when a request targets the root of a bundle.
    pub index_document: String,
    /// Bundle directories, relative to `install_dir`.
    pub roots: RootsSection,
}

impl Default for ProtocolSection {
    fn default() -> Self {
        Self {
            scheme: "app".to_owned(),
            install_dir: None,
            index_document: "index.html".to_owned(),
            roots: RootsSection::default(),
        }
    }
}

/// Relative base directories of the named UI bundles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootsSection {
    /// Updater window bundle.
    pub updater: PathBuf,
    /// Main window bundle.
    pub main: PathBuf,
    /// Custom titlebar bundle.
    pub titlebar: PathBuf,
    /// Settings window bundle.
    pub settings: PathBuf,
    /// Static assets shared by every bundle.
    pub assets: PathBuf,
}

impl Default for RootsSection {
    fn default() -> Self {
        Self {
            updater: PathBuf::from("ui/updater"),
            main: PathBuf::from("ui/main"),
            titlebar: PathBuf::from("ui/titlebar"),
            settings: PathBuf::from("ui/settings"),
            assets: PathBuf::from("assets"),
        }
    }
}

impl RootsSection {
    /// All configured roots paired with their dotted field names.
    #[must_use]
    pub fn entries(&self) -> [(&'static str, &PathBuf); 5] {
        [
            ("protocol.roots.updater", &self.updater),
            ("protocol.roots.main", &self.main),
            ("protocol.roots.titlebar", &self.titlebar),
            ("protocol.roots.settings", &self.settings),
            ("protocol.roots.assets", &self.assets),
        ]
    }
}

// ---------------------------------------------------------------------------
// DeepLinkSection
// ---------------------------------------------------------------------------

/// Settings for externally delivered deep links.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeepLinkSection {
    /// External scheme (`cadence` → `cadence://play/<id>`).
    pub scheme: String,
    /// Ask the OS to make this process the default handler at startup.
    pub register_default_handler: bool,
    /// How long a dispatch waits for the UI to become ready before the
    /// command is dropped. `0` waits indefinitely.
    pub ready_timeout_secs: u64,
}

impl Default for DeepLinkSection {
    fn default() -> Self {
        Self {
            scheme: "cadence".to_owned(),
            register_default_handler: true,
            ready_timeout_secs: 30,
        }
    }
}

impl DeepLinkSection {
    /// The readiness timeout, or `None` when the wait is unbounded.
    #[must_use]
    pub fn ready_timeout(&self) -> Option<std::time::Duration> {
        (self.ready_timeout_secs > 0)
            .then(|| std::time::Duration::from_secs(self.ready_timeout_secs))
    }
}

// ---------------------------------------------------------------------------
// LoggingSection
// ---------------------------------------------------------------------------

/// Logging and tracing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Global log level filter (`"trace"`, `"debug"`, `"info"`, `"warn"`,
    /// `"error"`).
    pub level: String,
    /// Output format: `"pretty"`, `"compact"`, `"json"`, or `"full"`.
    pub format: String,
    /// Per-crate tracing directives (e.g. `["cadence_protocol=debug"]`).
    pub directives: Vec<String>,
    /// Write daily-rotated log files here instead of to stderr.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "compact".to_owned(),
            directives: Vec::new(),
            directory: None,
        }
    }
}
