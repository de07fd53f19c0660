//! The sandbox gate every asset read must pass.
//!
//! [`check`] decides whether an untrusted relative path, joined onto a
//! fixed root, still names something inside that root. It is purely lexical:
//! no filesystem access, no symlink resolution. Callers that need symlink
//! containment canonicalize after a successful check (see
//! [`SymlinkPolicy`](crate::router::SymlinkPolicy)).

use std::path::{Component, Path, PathBuf};

/// Why a candidate was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// The candidate resolves to the root itself.
    Empty,
    /// The candidate resolves outside the root.
    Escape,
    /// The candidate is an absolute path, a drive path, or a UNC path.
    Absolute,
    /// The candidate contains a NUL byte.
    InvalidByte,
}

impl std::fmt::Display for Denial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "resolves to the root directory"),
            Self::Escape => write!(f, "resolves outside the root directory"),
            Self::Absolute => write!(f, "absolute path"),
            Self::InvalidByte => write!(f, "contains a NUL byte"),
        }
    }
}

/// Outcome of a sandbox check. Only [`SandboxDecision::Allowed`] carries a
/// path, so a rejected candidate can never be turned into a read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SandboxDecision {
    /// The candidate stays inside the root; this is the final path to read.
    Allowed(PathBuf),
    /// The candidate was refused.
    Denied(Denial),
}

impl SandboxDecision {
    /// Whether the candidate was accepted.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed(_))
    }

    /// The authorized path, if any.
    #[must_use]
    pub fn into_path(self) -> Option<PathBuf> {
        match self {
            Self::Allowed(path) => Some(path),
            Self::Denied(_) => None,
        }
    }
}

/// Whether `candidate` joined onto `root` stays strictly inside `root`.
#[must_use]
pub fn is_safe(root: &Path, candidate: &str) -> bool {
    check(root, candidate).is_allowed()
}

/// Decide whether `candidate` may be read from under `root`.
///
/// Backslashes are treated as separators on every platform. The candidate
/// is joined onto `root` and normalized; it is accepted only if the result,
/// taken relative to `root`, is non-empty, does not climb out with `..`,
/// and is not itself absolute.
#[must_use]
pub fn check(root: &Path, candidate: &str) -> SandboxDecision {
    if candidate.contains('\0') {
        return SandboxDecision::Denied(Denial::InvalidByte);
    }

    let candidate = candidate.replace('\\', "/");
    if looks_absolute(&candidate) {
        return SandboxDecision::Denied(Denial::Absolute);
    }

    let root = normalize(root);
    let resolved = normalize(&root.join(&candidate));

    let Ok(relative) = resolved.strip_prefix(&root) else {
        return SandboxDecision::Denied(Denial::Escape);
    };

    match relative.components().next() {
        None => SandboxDecision::Denied(Denial::Empty),
        Some(Component::ParentDir) => SandboxDecision::Denied(Denial::Escape),
        Some(Component::Prefix(_) | Component::RootDir) => {
            SandboxDecision::Denied(Denial::Absolute)
        },
        Some(_) if looks_absolute(&relative.to_string_lossy()) => {
            SandboxDecision::Denied(Denial::Absolute)
        },
        Some(_) => SandboxDecision::Allowed(resolved),
    }
}

/// Absolute on any platform: leading separator, `C:` drive prefix, or
/// `\\server` UNC form (already folded to `//server`).
fn looks_absolute(path: &str) -> bool {
    if path.starts_with('/') {
        return true;
    }
    let bytes = path.as_bytes();
    matches!(bytes, [drive, b':', ..] if drive.is_ascii_alphabetic())
}

/// Lexically normalize a path: drop `.`, fold `..` into its parent, and
/// never climb above a root or prefix. Leading `..` of a relative path is
/// kept.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {},
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                },
                Some(Component::RootDir | Component::Prefix(_)) => {},
                _ => out.push(".."),
            },
            Component::Normal(part) => out.push(part),
        }
    }
    out
}
