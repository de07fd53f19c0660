//! Configuration for the Cadence desktop client.
//!
//! One [`Config`] value describes the internal asset scheme and its bundle
//! roots, the external deep-link scheme, and logging.
//!
//! ```rust,no_run
//! use cadence_config::Config;
//!
//! let resolved = Config::load().unwrap();
//! println!("bundles are served over {}://", resolved.config.protocol.scheme);
//! for file in &resolved.loaded_files {
//!     println!("merged {file}");
//! }
//! ```
//!
//! Later layers override earlier ones:
//!
//! 1. `defaults.toml`, compiled in
//! 2. `/etc/cadence/config.toml`
//! 3. `<config dir>/cadence/config.toml`
//!
//! `CADENCE_*` environment variables only fill fields no file set.
//!
//! Nothing here depends on the other Cadence crates. Turning the config into
//! root tables or log settings is left to the binary.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod env;
pub mod error;
pub mod loader;
pub mod merge;
pub mod show;
pub mod types;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use show::{ResolvedConfig, ShowFormat};
pub use types::*;

impl Config {
    /// Layered load from the standard locations. See [`loader::load`].
    ///
    /// # Errors
    ///
    /// Fails on an unreadable or malformed file, or on a merged result that
    /// does not validate.
    pub fn load() -> ConfigResult<ResolvedConfig> {
        loader::load(None)
    }

    /// Layered load with the user layer read from `config_dir`.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`].
    pub fn load_with_config_dir(config_dir: &std::path::Path) -> ConfigResult<ResolvedConfig> {
        loader::load(Some(config_dir))
    }

    /// Load one file on its own, skipping the layered search.
    ///
    /// # Errors
    ///
    /// Fails when the file is missing, unreadable, malformed or invalid.
    pub fn load_file(path: &std::path::Path) -> ConfigResult<Self> {
        loader::load_file(path)
    }
}
