//! Startup state of the internal scheme.
//!
//! The lifecycle host owns one [`ProtocolRegistry`]: it declares the scheme
//! privileged, installs the router exactly once, and hands the router to
//! its request hook.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{ProtocolError, ProtocolResult};
use crate::fetch::{DiskFetcher, FileFetcher, ProtocolResponse};
use crate::request::ResourceRequest;
use crate::router::{LocalResourceRouter, policy_violation};

/// Privileges the host environment grants the internal scheme.
///
/// `standard` enables relative URL resolution against the scheme;
/// `secure` makes pages loaded from it a secure context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemePrivileges {
    /// Scheme name, without `://`.
    pub scheme: String,
    /// Treated as a standard, hierarchical scheme.
    pub standard: bool,
    /// Treated as a secure context.
    pub secure: bool,
}

impl SchemePrivileges {
    /// Standard and secure privileges for `scheme`.
    #[must_use]
    pub fn standard_secure(scheme: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            standard: true,
            secure: true,
        }
    }
}

/// Owns the one-time registration of the internal scheme and its router.
#[derive(Debug)]
pub struct ProtocolRegistry<F = DiskFetcher> {
    privileges: Option<SchemePrivileges>,
    router: Option<Arc<LocalResourceRouter<F>>>,
}

impl<F> Default for ProtocolRegistry<F> {
    fn default() -> Self {
        Self {
            privileges: None,
            router: None,
        }
    }
}

impl<F: FileFetcher> ProtocolRegistry<F> {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the internal scheme privileged. Repeating the same
    /// declaration is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::SchemeConflict`] if a different scheme was
    /// already declared.
    pub fn register_privileged_scheme(&mut self, privileges: SchemePrivileges) -> ProtocolResult<()> {
        match &self.privileges {
            Some(existing) if *existing == privileges => {
                debug!(scheme = %privileges.scheme, "scheme already registered");
                Ok(())
            },
            Some(existing) => Err(ProtocolError::SchemeConflict {
                registered: existing.scheme.clone(),
                requested: privileges.scheme,
            }),
            None => {
                info!(
                    scheme = %privileges.scheme,
                    standard = privileges.standard,
                    secure = privileges.secure,
                    "registered privileged scheme"
                );
                self.privileges = Some(privileges);
                Ok(())
            },
        }
    }

    /// The declared scheme, if any.
    #[must_use]
    pub fn scheme(&self) -> Option<&str> {
        self.privileges.as_ref().map(|p| p.scheme.as_str())
    }

    /// Install the router. Must follow
    /// [`register_privileged_scheme`](Self::register_privileged_scheme) and
    /// may only happen once.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::SchemeNotPrivileged`] if the scheme was not declared
    /// standard and secure first; [`ProtocolError::AlreadyInitialized`] on a
    /// second call.
    pub fn initialize(
        &mut self,
        router: LocalResourceRouter<F>,
    ) -> ProtocolResult<Arc<LocalResourceRouter<F>>> {
        let scheme = match &self.privileges {
            Some(p) if p.standard && p.secure => p.scheme.clone(),
            Some(p) => {
                return Err(ProtocolError::SchemeNotPrivileged {
                    scheme: p.scheme.clone(),
                });
            },
            None => {
                return Err(ProtocolError::SchemeNotPrivileged {
                    scheme: "<unregistered>".to_owned(),
                });
            },
        };

        if self.router.is_some() {
            return Err(ProtocolError::AlreadyInitialized { scheme });
        }

        let router = Arc::new(router);
        self.router = Some(Arc::clone(&router));
        info!(%scheme, "resource router initialized");
        Ok(router)
    }

    /// The installed router, if initialization has happened.
    #[must_use]
    pub fn router(&self) -> Option<&Arc<LocalResourceRouter<F>>> {
        self.router.as_ref()
    }

    /// Route a request, failing closed before initialization.
    pub async fn handle(&self, req: &ResourceRequest) -> ProtocolResponse {
        match &self.router {
            Some(router) => router.handle(req).await,
            None => {
                warn!(host = %req.host, path = %req.pathname, "request before router initialization");
                policy_violation()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::root::{RootSpec, RootTable};
    use http::StatusCode;
    use std::path::Path;

    fn router() -> LocalResourceRouter {
        let table = RootTable::under(
            Path::new("/opt/cadence"),
            RootSpec::ALL.map(|r| (r, Path::new(r.as_str()))),
        )
        .unwrap();
        LocalResourceRouter::new(Arc::new(table), "index.html")
    }

    #[test]
    fn test_initialize_requires_privileges() {
        let mut registry = ProtocolRegistry::new();
        let result = registry.initialize(router());
        assert!(matches!(result, Err(ProtocolError::SchemeNotPrivileged { .. })));
    }

    #[test]
    fn test_initialize_requires_secure() {
        let mut registry = ProtocolRegistry::new();
        let mut privileges = SchemePrivileges::standard_secure("app");
        privileges.secure = false;
        registry.register_privileged_scheme(privileges).unwrap();
        assert!(matches!(
            registry.initialize(router()),
            Err(ProtocolError::SchemeNotPrivileged { scheme }) if scheme == "app"
        ));
    }

    #[test]
    fn test_double_initialize_fails() {
        let mut registry = ProtocolRegistry::new();
        registry
            .register_privileged_scheme(SchemePrivileges::standard_secure("app"))
            .unwrap();
        registry.initialize(router()).unwrap();
        let second = registry.initialize(router());
        assert!(matches!(second, Err(ProtocolError::AlreadyInitialized { scheme }) if scheme == "app"));
    }

    #[test]
    fn test_privileged_registration_idempotent() {
        let mut registry = ProtocolRegistry::<DiskFetcher>::new();
        let privileges = SchemePrivileges::standard_secure("app");
        registry.register_privileged_scheme(privileges.clone()).unwrap();
        registry.register_privileged_scheme(privileges).unwrap();
        assert_eq!(registry.scheme(), Some("app"));

        let conflict =
            registry.register_privileged_scheme(SchemePrivileges::standard_secure("other"));
        assert!(matches!(conflict, Err(ProtocolError::SchemeConflict { .. })));
    }

    #[tokio::test]
    async fn test_handle_before_initialize_fails_closed() {
        let registry = ProtocolRegistry::<DiskFetcher>::new();
        let response = registry
            .handle(&ResourceRequest::get("main", "/index.html"))
            .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
