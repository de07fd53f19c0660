//! `cadence config`.

use anyhow::{Result, anyhow};
use cadence_config::{ResolvedConfig, ShowFormat, loader};

use crate::theme::{self, Tone};

/// Print the resolved configuration.
pub(crate) fn show_config(resolved: &ResolvedConfig, format: &str) -> Result<()> {
    let format: ShowFormat = format.parse().map_err(|e: String| anyhow!(e))?;
    let rendered = resolved.render(format).map_err(|e| anyhow!(e))?;
    println!("{rendered}");
    Ok(())
}

/// Print where configuration is read from.
pub(crate) fn show_paths(resolved: &ResolvedConfig) {
    println!("{}", theme::title("Configuration files"));
    println!("{}", theme::field("system", loader::SYSTEM_CONFIG_PATH));
    match loader::user_config_dir() {
        Ok(dir) => println!("{}", theme::field("user", &dir.join("config.toml").display().to_string())),
        Err(e) => println!("{}", theme::line(Tone::Caution, &format!("no user config directory: {e}"))),
    }

    println!("{}", theme::rule());
    if resolved.loaded_files.is_empty() {
        println!("{}", theme::line(Tone::Quiet, "No config files loaded; using defaults."));
    }
    for file in &resolved.loaded_files {
        println!("{}", theme::line(Tone::Good, file));
    }
}
