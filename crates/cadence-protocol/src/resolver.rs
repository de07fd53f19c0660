//! Maps `(host, pathname)` to a bundle root and an unvalidated candidate.

use std::path::Path;
use std::sync::Arc;

use crate::root::{RootSpec, RootTable};

/// Path segment that redirects a request to the shared assets root.
const ASSETS_SEGMENT: &str = "assets";

/// Resolver output: which root to read from and the untrusted path under it.
/// Nothing here has been checked by the guard yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath<'a> {
    /// The selected root, or `None` when the host is unknown.
    pub root: Option<(RootSpec, &'a Path)>,
    /// Candidate path relative to the root, leading separators removed.
    pub candidate: String,
}

/// Applies the routing rules of the internal scheme. Never touches the
/// filesystem.
#[derive(Debug, Clone)]
pub struct AssetResolver {
    roots: Arc<RootTable>,
    index_document: String,
}

impl AssetResolver {
    /// Create a resolver over `roots`, serving `index_document` for `/`.
    #[must_use]
    pub fn new(roots: Arc<RootTable>, index_document: impl Into<String>) -> Self {
        Self {
            roots,
            index_document: index_document.into(),
        }
    }

    /// The root table this resolver reads from.
    #[must_use]
    pub fn roots(&self) -> &RootTable {
        &self.roots
    }

    /// Resolve a request.
    ///
    /// 1. `host` selects a bundle; unknown hosts yield no root.
    /// 2. `/` (or an empty path) becomes the index document.
    /// 3. A leading run of `/assets` segments is stripped and the root
    ///    switches to the shared assets directory, whatever the host.
    /// 4. Remaining leading separators are stripped.
    #[must_use]
    pub fn resolve(&self, host: &str, pathname: &str) -> ResolvedPath<'_> {
        let mut root = RootSpec::from_host(host);

        let mut path = if pathname.is_empty() || pathname == "/" {
            self.index_document.as_str()
        } else {
            pathname
        };

        if let Some(rest) = strip_assets_prefix(path) {
            root = Some(RootSpec::Assets);
            path = rest;
        }

        let candidate = path.trim_start_matches(['/', '\\']).to_owned();

        ResolvedPath {
            root: root.map(|spec| (spec, self.roots.dir(spec))),
            candidate,
        }
    }
}

/// Strip every leading `<separators>assets` repetition. The prefix must be
/// followed by a separator or the end of the path, so `/assetsx.js` does not
/// match. Returns `None` when there is no such prefix.
fn strip_assets_prefix(path: &str) -> Option<&str> {
    let mut rest = path;
    let mut matched = false;

    loop {
        let trimmed = rest.trim_start_matches(['/', '\\']);
        if trimmed.len() == rest.len() {
            break;
        }
        match trimmed.strip_prefix(ASSETS_SEGMENT) {
            Some(after) if after.is_empty() || after.starts_with(['/', '\\']) => {
                rest = after;
                matched = true;
            },
            _ => break,
        }
    }

    matched.then_some(rest)
}
