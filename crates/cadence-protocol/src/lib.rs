//! Cadence Protocol - the sandboxed asset scheme.
//!
//! UI bundles are served over a custom scheme (`app://main/index.html`)
//! instead of `file://`. Every request goes through the same pipeline:
//!
//! 1. [`AssetResolver`] maps the host to a bundle root, defaults `/` to the
//!    index document, and rewrites the reserved `/assets/` prefix to the
//!    shared assets root.
//! 2. [`guard::check`] decides whether the candidate path stays inside its
//!    root. It is the only component allowed to authorize a read.
//! 3. [`LocalResourceRouter`] either delegates to a [`FileFetcher`] or
//!    answers `403 Policy Violation`.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use cadence_protocol::{
//!     LocalResourceRouter, ProtocolRegistry, ResourceRequest, RootSpec, RootTable,
//!     SchemePrivileges,
//! };
//!
//! # async fn run() -> Result<(), cadence_protocol::ProtocolError> {
//! let roots = RootTable::under(
//!     Path::new("/opt/cadence"),
//!     RootSpec::ALL.map(|r| (r, Path::new(r.as_str()))),
//! )?;
//!
//! let mut registry = ProtocolRegistry::new();
//! registry.register_privileged_scheme(SchemePrivileges::standard_secure("app"))?;
//! let router = registry.initialize(LocalResourceRouter::new(Arc::new(roots), "index.html"))?;
//!
//! let response = router.handle(&ResourceRequest::get("main", "/")).await;
//! println!("{}", response.status());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

/// Protocol error types.
pub mod error;
/// The file-fetch primitive.
pub mod fetch;
/// The sandbox guard.
pub mod guard;
/// One-time scheme registration state.
pub mod registry;
/// Request parsing.
pub mod request;
/// Host/path resolution.
pub mod resolver;
/// Named bundle roots.
pub mod root;
/// Request orchestration.
pub mod router;

pub use error::{ProtocolError, ProtocolResult};
pub use fetch::{DiskFetcher, FileFetcher, ProtocolResponse};
pub use guard::{Denial, SandboxDecision, is_safe};
pub use registry::{ProtocolRegistry, SchemePrivileges};
pub use request::ResourceRequest;
pub use resolver::{AssetResolver, ResolvedPath};
pub use root::{RootSpec, RootTable, RootTableBuilder};
pub use router::{LocalResourceRouter, POLICY_VIOLATION_BODY, SymlinkPolicy, policy_violation};
