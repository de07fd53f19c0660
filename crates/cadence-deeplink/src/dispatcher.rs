//! Turns external URIs into navigation commands for the UI surface.

use std::sync::Arc;
use std::time::Duration;

use cadence_telemetry::{Channel, RequestContext};
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, trace, warn};

use crate::command::{DeepLinkCommand, Verb};
use crate::error::DeepLinkError;
use crate::navigation::NavigationCommand;
use crate::surface::UiSurface;

/// Why a well-formed command was not delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// The surface did not exist yet.
    NotInitialized,
    /// The surface did not become ready within the configured wait.
    ReadyTimeout,
    /// The surface rejected the command.
    SendFailed,
}

/// What happened to one deep link.
///
/// Nothing here is an error to the caller: the OS that delivered the link
/// has no way to receive one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The command reached the surface.
    Sent(NavigationCommand),
    /// The link did not parse, or named a verb we do not know.
    Ignored(DeepLinkError),
    /// The link parsed but was not delivered.
    Dropped(DropReason),
}

impl DispatchOutcome {
    /// Whether a command reached the surface.
    #[must_use]
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent(_))
    }
}

/// Dispatches deep links to one UI surface.
///
/// Each call to [`handle`](Self::handle) is independent; a dispatch waiting
/// for readiness does not hold up any other.
pub struct DeepLinkDispatcher<S: ?Sized> {
    surface: Arc<S>,
    scheme: Option<String>,
    ready_timeout: Option<Duration>,
}

impl<S: ?Sized> std::fmt::Debug for DeepLinkDispatcher<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeepLinkDispatcher")
            .field("scheme", &self.scheme)
            .field("ready_timeout", &self.ready_timeout)
            .finish_non_exhaustive()
    }
}

impl<S: UiSurface + ?Sized + 'static> DeepLinkDispatcher<S> {
    /// Dispatcher accepting any scheme and waiting indefinitely for
    /// readiness.
    #[must_use]
    pub fn new(surface: Arc<S>) -> Self {
        Self {
            surface,
            scheme: None,
            ready_timeout: None,
        }
    }

    /// Only accept links with this scheme.
    #[must_use]
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    /// Bound the readiness wait. `None` waits indefinitely.
    #[must_use]
    pub fn with_ready_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.ready_timeout = timeout;
        self
    }

    /// The surface commands go to.
    #[must_use]
    pub fn surface(&self) -> &Arc<S> {
        &self.surface
    }

    /// Handle one external URI.
    pub async fn handle(&self, uri: &str) -> DispatchOutcome {
        let ctx = RequestContext::new(Channel::DeepLink);
        self.handle_inner(uri).instrument(ctx.span()).await
    }

    /// Handle a URI on a new task, so the caller never waits on the surface.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(self: &Arc<Self>, uri: impl Into<String>) -> JoinHandle<DispatchOutcome> {
        let this = Arc::clone(self);
        let uri = uri.into();
        tokio::spawn(async move { this.handle(&uri).await })
    }

    async fn handle_inner(&self, uri: &str) -> DispatchOutcome {
        debug!(%uri, "handling deep link");

        let command = match DeepLinkCommand::parse(uri, self.scheme.as_deref()) {
            Ok(command) => command,
            Err(e @ DeepLinkError::UnknownVerb(_)) => return DispatchOutcome::Ignored(e),
            Err(e @ DeepLinkError::InvalidArgument { .. }) => {
                debug!(error = %e, "rejecting deep link argument");
                return DispatchOutcome::Ignored(e);
            },
            Err(e) => {
                trace!(error = %e, "ignoring malformed deep link");
                return DispatchOutcome::Ignored(e);
            },
        };

        match command.verb {
            Verb::Play => self.deliver(command.navigation()).await,
        }
    }

    async fn deliver(&self, navigation: NavigationCommand) -> DispatchOutcome {
        if !self.surface.is_initialized() {
            debug!("ui surface not initialized, dropping deep link");
            return DispatchOutcome::Dropped(DropReason::NotInitialized);
        }

        match self.ready_timeout {
            Some(limit) => {
                if tokio::time::timeout(limit, self.surface.ready()).await.is_err() {
                    warn!(
                        timeout_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                        "ui surface not ready in time, dropping deep link"
                    );
                    return DispatchOutcome::Dropped(DropReason::ReadyTimeout);
                }
            },
            None => self.surface.ready().await,
        }

        match self.surface.send(navigation.clone()).await {
            Ok(()) => {
                debug!("deep link delivered");
                DispatchOutcome::Sent(navigation)
            },
            Err(e) => {
                warn!(error = %e, "failed to deliver deep link");
                DispatchOutcome::Dropped(DropReason::SendFailed)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeepLinkResult;
    use crate::surface::SurfaceReadiness;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct TestSurface {
        readiness: SurfaceReadiness,
        sent: Mutex<Vec<NavigationCommand>>,
        reject: bool,
    }

    #[async_trait]
    impl UiSurface for TestSurface {
        fn is_initialized(&self) -> bool {
            self.readiness.is_initialized()
        }

        async fn ready(&self) {
            self.readiness.wait_ready().await;
        }

        async fn send(&self, command: NavigationCommand) -> DeepLinkResult<()> {
            if self.reject {
                return Err(DeepLinkError::Surface("closed".to_owned()));
            }
            self.sent.lock().unwrap().push(command);
            Ok(())
        }
    }

    fn ready_surface() -> Arc<TestSurface> {
        let surface = TestSurface::default();
        surface.readiness.mark_ready();
        Arc::new(surface)
    }

    #[tokio::test]
    async fn test_sends_when_ready() {
        let surface = ready_surface();
        let dispatcher = DeepLinkDispatcher::new(Arc::clone(&surface)).with_scheme("cadence");

        let outcome = dispatcher.handle("cadence://play/abc123/def456").await;

        assert!(outcome.is_sent());
        assert_eq!(surface.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_drop_when_uninitialized() {
        let surface = Arc::new(TestSurface::default());
        let dispatcher = DeepLinkDispatcher::new(Arc::clone(&surface));

        let outcome = dispatcher.handle("cadence://play/abc123").await;

        assert_eq!(outcome, DispatchOutcome::Dropped(DropReason::NotInitialized));
        assert!(surface.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_verb_ignored() {
        let surface = ready_surface();
        let dispatcher = DeepLinkDispatcher::new(Arc::clone(&surface));

        let outcome = dispatcher.handle("cadence://pause/abc123").await;

        assert!(matches!(
            outcome,
            DispatchOutcome::Ignored(DeepLinkError::UnknownVerb(_))
        ));
        assert!(surface.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_wrong_scheme_ignored() {
        let surface = ready_surface();
        let dispatcher = DeepLinkDispatcher::new(Arc::clone(&surface)).with_scheme("cadence");

        let outcome = dispatcher.handle("https://play/abc123").await;
        assert!(matches!(
            outcome,
            DispatchOutcome::Ignored(DeepLinkError::SchemeMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn test_send_failure_is_drop() {
        let surface = TestSurface {
            reject: true,
            ..TestSurface::default()
        };
        surface.readiness.mark_ready();
        let dispatcher = DeepLinkDispatcher::new(Arc::new(surface));

        let outcome = dispatcher.handle("cadence://play/abc123").await;
        assert_eq!(outcome, DispatchOutcome::Dropped(DropReason::SendFailed));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_timeout_drops() {
        let surface = Arc::new(TestSurface::default());
        surface.readiness.mark_initializing();
        let dispatcher = DeepLinkDispatcher::new(Arc::clone(&surface))
            .with_ready_timeout(Some(Duration::from_secs(30)));

        let outcome = dispatcher.handle("cadence://play/abc123").await;

        assert_eq!(outcome, DispatchOutcome::Dropped(DropReason::ReadyTimeout));
        assert!(surface.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_spawned_dispatch_waits_for_ready() {
        let surface = Arc::new(TestSurface::default());
        surface.readiness.mark_initializing();
        let dispatcher = Arc::new(DeepLinkDispatcher::new(Arc::clone(&surface)));

        let pending = dispatcher.spawn("cadence://play/abc123");
        tokio::task::yield_now().await;
        assert!(!pending.is_finished());

        // Other links are not held up by the pending one.
        let other = dispatcher.handle("cadence://pause/x").await;
        assert!(matches!(other, DispatchOutcome::Ignored(_)));

        surface.readiness.mark_ready();
        let outcome = tokio::time::timeout(Duration::from_secs(5), pending)
            .await
            .unwrap()
            .unwrap();
        assert!(outcome.is_sent());
    }
}
