//! Named bundle roots and their fixed base directories.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ProtocolError, ProtocolResult};
use crate::guard::normalize;

/// One of the UI bundles served over the internal scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RootSpec {
    /// Updater window.
    Updater,
    /// Main window.
    Main,
    /// Custom titlebar.
    Titlebar,
    /// Settings window.
    Settings,
    /// Static assets shared by every bundle. Never selected by host; only
    /// reachable through the reserved `/assets/` prefix.
    Assets,
}

impl RootSpec {
    /// Every root, in table order.
    pub const ALL: [Self; 5] = [
        Self::Updater,
        Self::Main,
        Self::Titlebar,
        Self::Settings,
        Self::Assets,
    ];

    /// Lowercase name, as used in hosts and config keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Updater => "updater",
            Self::Main => "main",
            Self::Titlebar => "titlebar",
            Self::Settings => "settings",
            Self::Assets => "assets",
        }
    }

    /// Map a request host to the bundle it selects.
    ///
    /// Returns `None` for unknown hosts and for `assets`, which cannot be
    /// addressed directly.
    #[must_use]
    pub fn from_host(host: &str) -> Option<Self> {
        [Self::Updater, Self::Main, Self::Titlebar, Self::Settings]
            .into_iter()
            .find(|root| root.as_str().eq_ignore_ascii_case(host))
    }

    const fn index(self) -> usize {
        match self {
            Self::Updater => 0,
            Self::Main => 1,
            Self::Titlebar => 2,
            Self::Settings => 3,
            Self::Assets => 4,
        }
    }
}

impl fmt::Display for RootSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable mapping from every [`RootSpec`] to an absolute base directory.
///
/// Built once at startup; there is no way to change an entry afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootTable {
    dirs: [PathBuf; 5],
}

impl RootTable {
    /// Start building a table.
    #[must_use]
    pub fn builder() -> RootTableBuilder {
        RootTableBuilder::default()
    }

    /// Build a table whose roots are `relative` directories under
    /// `install_dir`.
    ///
    /// # Errors
    ///
    /// Fails if a root is missing, `install_dir` is not absolute, or a
    /// relative directory climbs out of `install_dir`.
    pub fn under<'a>(
        install_dir: &Path,
        relative: impl IntoIterator<Item = (RootSpec, &'a Path)>,
    ) -> ProtocolResult<Self> {
        let mut builder = Self::builder();
        for (root, rel) in relative {
            if rel.is_absolute() || normalize(rel).starts_with("..") {
                return Err(ProtocolError::InvalidRoot {
                    root,
                    reason: format!("'{}' must stay inside the install directory", rel.display()),
                });
            }
            builder = builder.root(root, install_dir.join(rel));
        }
        builder.build()
    }

    /// Base directory of `root`.
    #[must_use]
    pub fn dir(&self, root: RootSpec) -> &Path {
        &self.dirs[root.index()]
    }

    /// Iterate over `(root, dir)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (RootSpec, &Path)> {
        RootSpec::ALL.into_iter().map(|root| (root, self.dir(root)))
    }
}

/// Collects base directories for a [`RootTable`].
#[derive(Debug, Default)]
pub struct RootTableBuilder {
    dirs: [Option<PathBuf>; 5],
}

impl RootTableBuilder {
    /// Set the base directory of `root`.
    #[must_use]
    pub fn root(mut self, root: RootSpec, dir: impl Into<PathBuf>) -> Self {
        self.dirs[root.index()] = Some(dir.into());
        self
    }

    /// Validate and freeze the table. Directories are normalized lexically;
    /// the filesystem is not consulted.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::MissingRoot`] if any root is unset, or
    /// [`ProtocolError::InvalidRoot`] if a directory is not absolute.
    pub fn build(self) -> ProtocolResult<RootTable> {
        let mut dirs: [PathBuf; 5] = Default::default();
        for root in RootSpec::ALL {
            let Some(dir) = &self.dirs[root.index()] else {
                return Err(ProtocolError::MissingRoot(root));
            };
            if !dir.is_absolute() {
                return Err(ProtocolError::InvalidRoot {
                    root,
                    reason: format!("'{}' is not an absolute path", dir.display()),
                });
            }
            dirs[root.index()] = normalize(dir);
        }
        Ok(RootTable { dirs })
    }
}
