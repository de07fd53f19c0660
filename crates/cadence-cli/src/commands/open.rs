//! `cadence open`: dispatch a deep link to a surface that prints commands.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use cadence_config::Config;
use cadence_deeplink::{
    DeepLinkError, DeepLinkResult, DispatchOutcome, NavigationCommand, SurfaceReadiness,
    UiSurface,
};
use tracing::debug;

use crate::config_bridge;
use crate::theme::{self, Tone};

/// Surface that writes each command to stdout as one JSON line.
#[derive(Debug, Default)]
pub(crate) struct StdoutSurface {
    readiness: SurfaceReadiness,
}

#[async_trait]
impl UiSurface for StdoutSurface {
    fn is_initialized(&self) -> bool {
        self.readiness.is_initialized()
    }

    async fn ready(&self) {
        self.readiness.wait_ready().await;
    }

    async fn send(&self, command: NavigationCommand) -> DeepLinkResult<()> {
        let line = command
            .to_json()
            .map_err(|e| DeepLinkError::Surface(e.to_string()))?;
        println!("{line}");
        Ok(())
    }
}

/// How the simulated surface behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SurfaceMode {
    /// Ready immediately.
    Ready,
    /// Never created.
    Uninitialized,
    /// Becomes ready after a delay.
    ReadyAfter(Duration),
}

/// Dispatch `uri`, report the outcome on stderr and return it.
pub(crate) async fn run_open(
    cfg: &Config,
    uri: &str,
    mode: SurfaceMode,
) -> Result<DispatchOutcome> {
    let surface = Arc::new(StdoutSurface::default());
    match mode {
        SurfaceMode::Ready => surface.readiness.mark_ready(),
        SurfaceMode::Uninitialized => {},
        SurfaceMode::ReadyAfter(delay) => {
            surface.readiness.mark_initializing();
            let readiness = surface.readiness.clone();
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                debug!("simulated surface ready");
                readiness.mark_ready();
            });
        },
    }

    let dispatcher = Arc::new(config_bridge::to_dispatcher(cfg, surface));
    let outcome = dispatcher.spawn(uri).await?;

    match &outcome {
        DispatchOutcome::Sent(_) => eprintln!("{}", theme::line(Tone::Good, "Delivered")),
        DispatchOutcome::Ignored(reason) => {
            eprintln!("{}", theme::line(Tone::Note, &format!("Ignored: {reason}")));
        },
        DispatchOutcome::Dropped(reason) => {
            eprintln!("{}", theme::line(Tone::Caution, &format!("Dropped: {reason:?}")));
        },
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_deeplink::DropReason;

    const LINK: &str = "cadence://play/abc123";

    #[tokio::test]
    async fn test_ready_surface_receives_command() {
        let outcome = run_open(&Config::default(), LINK, SurfaceMode::Ready)
            .await
            .unwrap();
        assert!(outcome.is_sent(), "{outcome:?}");
    }

    #[tokio::test]
    async fn test_missing_surface_drops_link() {
        let outcome = run_open(&Config::default(), LINK, SurfaceMode::Uninitialized)
            .await
            .unwrap();
        assert_eq!(outcome, DispatchOutcome::Dropped(DropReason::NotInitialized));
    }

    #[tokio::test]
    async fn test_delayed_surface_receives_command_once_ready() {
        let mode = SurfaceMode::ReadyAfter(Duration::from_millis(10));
        let outcome = run_open(&Config::default(), LINK, mode).await.unwrap();
        assert!(outcome.is_sent(), "{outcome:?}");
    }

    #[tokio::test]
    async fn test_unknown_verb_ignored() {
        let outcome = run_open(&Config::default(), "cadence://pause/abc123", SurfaceMode::Ready)
            .await
            .unwrap();
        assert_eq!(
            outcome,
            DispatchOutcome::Ignored(DeepLinkError::UnknownVerb("pause".to_owned()))
        );
    }
}
