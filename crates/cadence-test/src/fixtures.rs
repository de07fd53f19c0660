//! Test fixtures.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use cadence_deeplink::{NavigationCommand, WatchEndpoint};
use cadence_protocol::{ProtocolError, RootSpec, RootTable};

/// Contents of the file placed next to, not inside, the bundle roots.
pub const SECRET_CONTENTS: &str = "top secret";

/// A throwaway install tree.
///
/// Layout under the temporary directory:
///
/// ```text
/// secret.txt                 outside every root
/// ui/<root>/index.html       one per bundle root
/// ui/main/js/app.js
/// assets/icon.svg
/// ```
#[derive(Debug)]
pub struct TestInstall {
    dir: TempDir,
    roots: Arc<RootTable>,
}

impl TestInstall {
    /// Create the tree.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the tree cannot be written.
    pub fn new() -> std::io::Result<Self> {
        let dir = tempfile::tempdir()?;
        let base = dir.path();

        std::fs::write(base.join("secret.txt"), SECRET_CONTENTS)?;
        for spec in RootSpec::ALL {
            let root = base.join(relative_dir(spec));
            std::fs::create_dir_all(&root)?;
            if spec != RootSpec::Assets {
                std::fs::write(root.join("index.html"), format!("<html>{spec}</html>"))?;
            }
        }
        std::fs::create_dir_all(base.join("ui/main/js"))?;
        std::fs::write(base.join("ui/main/js/app.js"), "console.log('main');")?;
        std::fs::write(base.join("assets/icon.svg"), "<svg/>")?;

        let roots = RootTable::under(base, RootSpec::ALL.map(|r| (r, relative_dir(r))))
            .map_err(|e: ProtocolError| std::io::Error::other(e.to_string()))?;

        Ok(Self {
            dir,
            roots: Arc::new(roots),
        })
    }

    /// The install directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// The root table for this tree.
    #[must_use]
    pub fn roots(&self) -> Arc<RootTable> {
        Arc::clone(&self.roots)
    }

    /// Absolute path of a file in the tree.
    #[must_use]
    pub fn file(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.dir.path().join(relative)
    }
}

fn relative_dir(spec: RootSpec) -> &'static Path {
    Path::new(match spec {
        RootSpec::Updater => "ui/updater",
        RootSpec::Main => "ui/main",
        RootSpec::Titlebar => "ui/titlebar",
        RootSpec::Settings => "ui/settings",
        RootSpec::Assets => "assets",
    })
}

/// A root table under a fixed, nonexistent install dir. For tests that
/// never read files.
///
/// # Panics
///
/// Never in practice; the paths are constant and absolute.
#[must_use]
pub fn test_roots() -> Arc<RootTable> {
    let table = RootTable::under(
        Path::new("/opt/cadence"),
        RootSpec::ALL.map(|r| (r, relative_dir(r))),
    )
    .expect("constant root table");
    Arc::new(table)
}

/// `cadence://play/<video>[/<playlist>]`.
#[must_use]
pub fn play_uri(video_id: &str, playlist_id: Option<&str>) -> String {
    match playlist_id {
        Some(playlist) => format!("cadence://play/{video_id}/{playlist}"),
        None => format!("cadence://play/{video_id}"),
    }
}

/// The navigation command expected for a `play` link.
#[must_use]
pub fn watch(video_id: &str, playlist_id: Option<&str>) -> NavigationCommand {
    NavigationCommand::Navigate {
        watch_endpoint: WatchEndpoint {
            video_id: video_id.to_owned(),
            playlist_id: playlist_id.map(str::to_owned),
        },
    }
}
