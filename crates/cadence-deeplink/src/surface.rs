//! The UI surface a deep link is delivered to.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::error::DeepLinkResult;
use crate::navigation::NavigationCommand;

/// The window that receives navigation commands.
///
/// The surface owns its readiness state; the dispatcher only queries it
/// and waits on it.
#[async_trait]
pub trait UiSurface: Send + Sync {
    /// Whether the surface exists at all. Commands for a surface that does
    /// not exist yet are dropped.
    fn is_initialized(&self) -> bool;

    /// Resolves once the surface can accept commands. Must not block the
    /// thread while waiting.
    async fn ready(&self);

    /// Deliver one command.
    async fn send(&self, command: NavigationCommand) -> DeepLinkResult<()>;
}

/// Lifecycle of a UI surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SurfaceState {
    /// Not created yet.
    Uninitialized,
    /// Created, still loading.
    Initializing,
    /// Accepting commands.
    Ready,
}

/// Shared readiness flag for implementing [`UiSurface`].
///
/// Cloning gives another handle to the same state. Transitions only move
/// forward: once `Ready`, the state stays `Ready`.
#[derive(Debug, Clone)]
pub struct SurfaceReadiness {
    tx: Arc<watch::Sender<SurfaceState>>,
}

impl Default for SurfaceReadiness {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceReadiness {
    /// Start out uninitialized.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SurfaceState::Uninitialized);
        Self { tx: Arc::new(tx) }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> SurfaceState {
        *self.tx.borrow()
    }

    /// `true` from `Initializing` on.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.state() >= SurfaceState::Initializing
    }

    /// Surface created.
    pub fn mark_initializing(&self) {
        self.advance(SurfaceState::Initializing);
    }

    /// Surface ready for commands. Wakes every waiter.
    pub fn mark_ready(&self) {
        self.advance(SurfaceState::Ready);
    }

    /// Wait until the state is `Ready`.
    pub async fn wait_ready(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as `self`, so this cannot see a closed channel.
        let _ = rx.wait_for(|state| *state == SurfaceState::Ready).await;
    }

    fn advance(&self, next: SurfaceState) {
        self.tx.send_if_modified(|state| {
            if next > *state {
                *state = next;
                true
            } else {
                false
            }
        });
    }
}
