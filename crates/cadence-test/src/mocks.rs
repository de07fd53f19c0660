//! Mock implementations for testing.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use http::{Response, StatusCode};

use cadence_deeplink::{
    DeepLinkError, DeepLinkResult, NavigationCommand, SchemeRegistrar, SurfaceReadiness,
    UiSurface,
};
use cadence_protocol::{FileFetcher, ProtocolResponse};

/// UI surface whose readiness the test drives, recording every command it
/// receives.
///
/// Clones share state, so a test can keep one handle while the dispatcher
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct MockSurface {
    readiness: SurfaceReadiness,
    sent: Arc<Mutex<Vec<NavigationCommand>>>,
    fail_sends: bool,
}

impl MockSurface {
    /// A surface that does not exist yet.
    #[must_use]
    pub fn uninitialized() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A surface that exists but is still loading.
    #[must_use]
    pub fn initializing() -> Arc<Self> {
        let surface = Self::default();
        surface.readiness.mark_initializing();
        Arc::new(surface)
    }

    /// A surface ready for commands.
    #[must_use]
    pub fn ready() -> Arc<Self> {
        let surface = Self::default();
        surface.readiness.mark_ready();
        Arc::new(surface)
    }

    /// A ready surface that rejects every command.
    #[must_use]
    pub fn rejecting() -> Arc<Self> {
        let surface = Self {
            fail_sends: true,
            ..Self::default()
        };
        surface.readiness.mark_ready();
        Arc::new(surface)
    }

    /// The readiness handle, for driving transitions.
    #[must_use]
    pub fn readiness(&self) -> &SurfaceReadiness {
        &self.readiness
    }

    /// Commands received so far.
    #[must_use]
    pub fn sent(&self) -> Vec<NavigationCommand> {
        self.sent.lock().map(|g| g.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl UiSurface for MockSurface {
    fn is_initialized(&self) -> bool {
        self.readiness.is_initialized()
    }

    async fn ready(&self) {
        self.readiness.wait_ready().await;
    }

    async fn send(&self, command: NavigationCommand) -> DeepLinkResult<()> {
        if self.fail_sends {
            return Err(DeepLinkError::Surface("mock surface rejects commands".to_owned()));
        }
        if let Ok(mut guard) = self.sent.lock() {
            guard.push(command);
        }
        Ok(())
    }
}

/// File fetcher that answers `200` with the path as the body and records
/// every path it is asked for. Never touches the disk.
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    fetched: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockFetcher {
    /// Create a new mock fetcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths fetched so far.
    #[must_use]
    pub fn fetched(&self) -> Vec<PathBuf> {
        self.fetched.lock().map(|g| g.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl FileFetcher for MockFetcher {
    async fn fetch(&self, path: &Path) -> ProtocolResponse {
        if let Ok(mut guard) = self.fetched.lock() {
            guard.push(path.to_path_buf());
        }
        let mut response = Response::new(path.to_string_lossy().into_owned().into_bytes());
        *response.status_mut() = StatusCode::OK;
        response
    }
}

/// Scheme registrar that keeps its state in memory.
#[derive(Debug, Default)]
pub struct MockRegistrar {
    registered: Mutex<Vec<String>>,
    set_calls: Mutex<usize>,
    fail: bool,
}

impl MockRegistrar {
    /// Create a new mock registrar with nothing registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registrar whose every call fails.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Pretend `scheme` is already registered.
    #[must_use]
    pub fn with_registered(self, scheme: impl Into<String>) -> Self {
        if let Ok(mut guard) = self.registered.lock() {
            guard.push(scheme.into());
        }
        self
    }

    /// How many times registration was attempted.
    #[must_use]
    pub fn set_calls(&self) -> usize {
        self.set_calls.lock().map(|g| *g).unwrap_or_default()
    }
}

impl SchemeRegistrar for MockRegistrar {
    fn is_default_handler(&self, scheme: &str) -> DeepLinkResult<bool> {
        if self.fail {
            return Err(DeepLinkError::Registration("mock query failure".to_owned()));
        }
        Ok(self
            .registered
            .lock()
            .map(|g| g.iter().any(|s| s == scheme))
            .unwrap_or(false))
    }

    fn set_default_handler(&self, scheme: &str) -> DeepLinkResult<()> {
        if let Ok(mut calls) = self.set_calls.lock() {
            *calls = calls.saturating_add(1);
        }
        if self.fail {
            return Err(DeepLinkError::Registration("mock registration failure".to_owned()));
        }
        if let Ok(mut guard) = self.registered.lock() {
            guard.push(scheme.to_owned());
        }
        Ok(())
    }
}
