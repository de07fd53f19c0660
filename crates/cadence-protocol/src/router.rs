//! Per-request orchestration: resolve, check, then fetch or refuse.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use cadence_telemetry::{Channel, RequestContext};
use http::header::CONTENT_TYPE;
use http::{HeaderValue, Method, Response, StatusCode};
use tracing::{Instrument, debug, trace, warn};

use crate::fetch::{DiskFetcher, FileFetcher, ProtocolResponse, text_response};
use crate::guard::{self, SandboxDecision};
use crate::request::ResourceRequest;
use crate::resolver::AssetResolver;
use crate::root::RootTable;

/// Body of every rejection.
pub const POLICY_VIOLATION_BODY: &str = "Policy Violation";

/// How the router treats symbolic links inside a root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SymlinkPolicy {
    /// Trust the lexical guard decision; links inside a root are followed
    /// wherever they point.
    #[default]
    Lexical,
    /// After the guard accepts a path, canonicalize it and the root and
    /// refuse the request unless the real path is still inside the real
    /// root.
    Canonicalize,
}

/// The `403 Policy Violation` response.
#[must_use]
pub fn policy_violation() -> ProtocolResponse {
    let mut response = Response::new(POLICY_VIOLATION_BODY.as_bytes().to_vec());
    *response.status_mut() = StatusCode::FORBIDDEN;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("text/html"));
    response
}

/// Serves the internal scheme.
///
/// Stateless per request: concurrent calls to [`handle`](Self::handle)
/// share only the immutable root table.
#[derive(Debug)]
pub struct LocalResourceRouter<F = DiskFetcher> {
    resolver: AssetResolver,
    fetcher: F,
    symlinks: SymlinkPolicy,
}

impl LocalResourceRouter<DiskFetcher> {
    /// Router reading from disk.
    #[must_use]
    pub fn new(roots: Arc<RootTable>, index_document: impl Into<String>) -> Self {
        Self::with_fetcher(roots, index_document, DiskFetcher)
    }
}

impl<F: FileFetcher> LocalResourceRouter<F> {
    /// Router delegating authorized reads to `fetcher`.
    #[must_use]
    pub fn with_fetcher(
        roots: Arc<RootTable>,
        index_document: impl Into<String>,
        fetcher: F,
    ) -> Self {
        Self {
            resolver: AssetResolver::new(roots, index_document),
            fetcher,
            symlinks: SymlinkPolicy::default(),
        }
    }

    /// Set the symlink policy.
    #[must_use]
    pub fn with_symlink_policy(mut self, policy: SymlinkPolicy) -> Self {
        self.symlinks = policy;
        self
    }

    /// The resolver used by this router.
    #[must_use]
    pub fn resolver(&self) -> &AssetResolver {
        &self.resolver
    }

    /// Answer one request.
    ///
    /// Only `GET` and `HEAD` are served. Unknown hosts and candidates the
    /// guard refuses get [`policy_violation`] without any file access.
    /// Otherwise the fetcher's response is returned as is (with the body
    /// dropped for `HEAD`).
    pub async fn handle(&self, req: &ResourceRequest) -> ProtocolResponse {
        let ctx = RequestContext::new(Channel::Asset);
        let span = ctx.span();
        let response = self.handle_inner(req).instrument(span.clone()).await;
        span.in_scope(|| {
            trace!(
                status = response.status().as_u16(),
                elapsed_ms = ctx.elapsed_ms(),
                "request finished"
            );
        });
        response
    }

    async fn handle_inner(&self, req: &ResourceRequest) -> ProtocolResponse {
        debug!(
            method = %req.method,
            host = %req.host,
            path = %req.pathname,
            "handling resource request"
        );

        if req.method != Method::GET && req.method != Method::HEAD {
            debug!(method = %req.method, "method not allowed");
            return text_response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
        }

        let Some(path) = self.authorize(req).await else {
            return policy_violation();
        };

        debug!(path = %path.display(), "serving resolved asset");
        let mut response = self.fetcher.fetch(&path).await;
        if req.method == Method::HEAD {
            response.body_mut().clear();
        }
        response
    }

    /// Run the resolver and the guard; `Some` only for an authorized path.
    async fn authorize(&self, req: &ResourceRequest) -> Option<PathBuf> {
        let resolved = self.resolver.resolve(&req.host, &req.pathname);

        let Some((spec, root)) = resolved.root else {
            warn!(host = %req.host, path = %req.pathname, "policy violation: unknown host");
            return None;
        };

        let path = match guard::check(root, &resolved.candidate) {
            SandboxDecision::Allowed(path) => path,
            SandboxDecision::Denied(reason) => {
                warn!(
                    host = %req.host,
                    path = %req.pathname,
                    root = %spec,
                    %reason,
                    "policy violation: path rejected by sandbox"
                );
                return None;
            },
        };

        match self.symlinks {
            SymlinkPolicy::Lexical => Some(path),
            SymlinkPolicy::Canonicalize => {
                if contained_after_canonicalize(root, &path).await {
                    Some(path)
                } else {
                    warn!(
                        host = %req.host,
                        path = %req.pathname,
                        root = %spec,
                        "policy violation: path escapes root through a link"
                    );
                    None
                }
            },
        }
    }
}

/// Whether the real location of `path` is inside the real location of
/// `root`. A missing target is allowed through so the fetcher can answer
/// 404; any other canonicalization failure refuses.
async fn contained_after_canonicalize(root: &Path, path: &Path) -> bool {
    let Ok(real_root) = tokio::fs::canonicalize(root).await else {
        return false;
    };
    match tokio::fs::canonicalize(path).await {
        Ok(real_path) => real_path.starts_with(&real_root) && real_path != real_root,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
        Err(_) => false,
    }
}
