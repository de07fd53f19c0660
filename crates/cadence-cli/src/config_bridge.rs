//! Bridge from `cadence_config::Config` to domain types.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use cadence_config::{Config, ResolvedConfig};
use cadence_deeplink::{DeepLinkDispatcher, UiSurface};
use cadence_protocol::{
    LocalResourceRouter, ProtocolRegistry, RootSpec, RootTable, SchemePrivileges, SymlinkPolicy,
};
use cadence_telemetry::{LogConfig, LogFormat};

/// Load either a single file or the full layered configuration.
pub(crate) fn load_config(path: Option<&Path>) -> Result<ResolvedConfig> {
    match path {
        Some(path) => {
            let config = Config::load_file(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            Ok(ResolvedConfig {
                config,
                field_sources: cadence_config::merge::FieldSources::new(),
                loaded_files: vec![path.display().to_string()],
            })
        },
        None => Config::load().context("failed to load configuration"),
    }
}

/// Logging setup from the `[logging]` section.
pub(crate) fn to_log_config(cfg: &Config) -> LogConfig {
    LogConfig::from_section(&cfg.logging)
        .unwrap_or_else(|_| LogConfig::new(&cfg.logging.level).with_format(LogFormat::Compact))
}

/// The configured install directory, or the directory holding the running
/// executable.
pub(crate) fn install_dir(cfg: &Config) -> Result<PathBuf> {
    if let Some(dir) = &cfg.protocol.install_dir {
        return Ok(dir.clone());
    }
    let exe = std::env::current_exe().context("cannot locate the running executable")?;
    exe.parent()
        .map(Path::to_path_buf)
        .context("executable has no parent directory")
}

/// Relative directory configured for `root`.
fn relative_root(cfg: &Config, root: RootSpec) -> &Path {
    let roots = &cfg.protocol.roots;
    match root {
        RootSpec::Updater => &roots.updater,
        RootSpec::Main => &roots.main,
        RootSpec::Titlebar => &roots.titlebar,
        RootSpec::Settings => &roots.settings,
        RootSpec::Assets => &roots.assets,
    }
}

/// Root table under `install_dir`.
pub(crate) fn to_root_table(cfg: &Config, install_dir: &Path) -> Result<RootTable> {
    let table = RootTable::under(
        install_dir,
        RootSpec::ALL.map(|root| (root, relative_root(cfg, root))),
    )?;
    Ok(table)
}

/// Declare the scheme, build the router and install it.
pub(crate) fn to_registry(
    cfg: &Config,
    install_dir: &Path,
    symlinks: SymlinkPolicy,
) -> Result<ProtocolRegistry> {
    let roots = Arc::new(to_root_table(cfg, install_dir)?);
    let mut registry = ProtocolRegistry::new();
    registry.register_privileged_scheme(SchemePrivileges::standard_secure(
        cfg.protocol.scheme.clone(),
    ))?;
    registry.initialize(
        LocalResourceRouter::new(roots, cfg.protocol.index_document.clone())
            .with_symlink_policy(symlinks),
    )?;
    Ok(registry)
}

/// Dispatcher for the configured deep-link scheme.
pub(crate) fn to_dispatcher<S: UiSurface + 'static>(
    cfg: &Config,
    surface: Arc<S>,
) -> DeepLinkDispatcher<S> {
    DeepLinkDispatcher::new(surface)
        .with_scheme(cfg.deep_link.scheme.clone())
        .with_ready_timeout(cfg.deep_link.ready_timeout())
}
