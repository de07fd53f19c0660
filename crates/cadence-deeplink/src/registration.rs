//! Best-effort registration as the OS default handler for the deep-link
//! scheme.

use std::path::PathBuf;
use std::process::Command;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use crate::error::{DeepLinkError, DeepLinkResult};

/// OS facility for default URL-scheme handlers.
pub trait SchemeRegistrar: Send + Sync {
    /// Whether this application already handles `scheme`.
    ///
    /// # Errors
    ///
    /// Returns [`DeepLinkError::Registration`] if the OS cannot be queried.
    fn is_default_handler(&self, scheme: &str) -> DeepLinkResult<bool>;

    /// Make this application the handler for `scheme`.
    ///
    /// # Errors
    ///
    /// Returns [`DeepLinkError::Registration`] if the OS refuses.
    fn set_default_handler(&self, scheme: &str) -> DeepLinkResult<()>;
}

/// Result of [`HandlerRegistration::ensure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// Already the default handler; nothing changed.
    AlreadyRegistered,
    /// Registered by this call.
    Registered,
    /// Attempted and failed. The failure was logged.
    Failed,
    /// Already attempted earlier in this process.
    Skipped,
}

/// At-most-once guard around a [`SchemeRegistrar`].
#[derive(Debug, Default)]
pub struct HandlerRegistration {
    attempted: AtomicBool,
}

impl HandlerRegistration {
    /// Fresh guard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `scheme` unless it already is, or unless this guard already
    /// tried. Never fails.
    pub fn ensure(&self, registrar: &dyn SchemeRegistrar, scheme: &str) -> RegistrationOutcome {
        if self.attempted.swap(true, Ordering::AcqRel) {
            debug!(%scheme, "default handler registration already attempted");
            return RegistrationOutcome::Skipped;
        }

        match registrar.is_default_handler(scheme) {
            Ok(true) => {
                debug!(%scheme, "already the default handler");
                return RegistrationOutcome::AlreadyRegistered;
            },
            Ok(false) => {},
            Err(e) => {
                warn!(%scheme, error = %e, "could not query default handler");
                return RegistrationOutcome::Failed;
            },
        }

        match registrar.set_default_handler(scheme) {
            Ok(()) => {
                info!(%scheme, "registered as default handler");
                RegistrationOutcome::Registered
            },
            Err(e) => {
                warn!(%scheme, error = %e, "failed to register default handler");
                RegistrationOutcome::Failed
            },
        }
    }

    /// Whether [`ensure`](Self::ensure) has run.
    #[must_use]
    pub fn attempted(&self) -> bool {
        self.attempted.load(Ordering::Acquire)
    }
}

/// Registers through `xdg-mime` on freedesktop systems.
#[derive(Debug, Clone)]
pub struct XdgRegistrar {
    desktop_file: String,
    binary: Option<PathBuf>,
}

impl XdgRegistrar {
    /// Registrar for the given `.desktop` entry (e.g. `cadence.desktop`).
    /// Looks `xdg-mime` up on `PATH` once.
    #[must_use]
    pub fn new(desktop_file: impl Into<String>) -> Self {
        Self {
            desktop_file: desktop_file.into(),
            binary: which::which("xdg-mime").ok(),
        }
    }

    fn mime_type(scheme: &str) -> String {
        format!("x-scheme-handler/{scheme}")
    }

    fn run(&self, args: &[&str]) -> DeepLinkResult<String> {
        let binary = self
            .binary
            .as_ref()
            .ok_or_else(|| DeepLinkError::Registration("xdg-mime not found on PATH".to_owned()))?;

        let output = Command::new(binary)
            .args(args)
            .output()
            .map_err(|e| DeepLinkError::Registration(format!("failed to run xdg-mime: {e}")))?;

        if !output.status.success() {
            return Err(DeepLinkError::Registration(format!(
                "xdg-mime exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_owned())
    }
}

impl SchemeRegistrar for XdgRegistrar {
    fn is_default_handler(&self, scheme: &str) -> DeepLinkResult<bool> {
        let current = self.run(&["query", "default", &Self::mime_type(scheme)])?;
        Ok(current == self.desktop_file)
    }

    fn set_default_handler(&self, scheme: &str) -> DeepLinkResult<()> {
        self.run(&["default", &self.desktop_file, &Self::mime_type(scheme)])
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeRegistrar {
        registered: Mutex<bool>,
        fail_set: bool,
        calls: Mutex<u32>,
    }

    impl SchemeRegistrar for FakeRegistrar {
        fn is_default_handler(&self, _scheme: &str) -> DeepLinkResult<bool> {
            Ok(*self.registered.lock().unwrap())
        }

        fn set_default_handler(&self, _scheme: &str) -> DeepLinkResult<()> {
            let mut calls = self.calls.lock().unwrap();
            *calls = calls.saturating_add(1);
            if self.fail_set {
                return Err(DeepLinkError::Registration("denied".to_owned()));
            }
            *self.registered.lock().unwrap() = true;
            Ok(())
        }
    }

    #[test]
    fn test_registers_once() {
        let registrar = FakeRegistrar::default();
        let guard = HandlerRegistration::new();

        assert_eq!(guard.ensure(&registrar, "cadence"), RegistrationOutcome::Registered);
        assert_eq!(guard.ensure(&registrar, "cadence"), RegistrationOutcome::Skipped);
        assert_eq!(*registrar.calls.lock().unwrap(), 1);
        assert!(guard.attempted());
    }

    #[test]
    fn test_already_registered_not_reset() {
        let registrar = FakeRegistrar::default();
        *registrar.registered.lock().unwrap() = true;

        let outcome = HandlerRegistration::new().ensure(&registrar, "cadence");
        assert_eq!(outcome, RegistrationOutcome::AlreadyRegistered);
        assert_eq!(*registrar.calls.lock().unwrap(), 0);
    }

    #[test]
    fn test_failure_is_not_fatal() {
        let registrar = FakeRegistrar {
            fail_set: true,
            ..FakeRegistrar::default()
        };
        let guard = HandlerRegistration::new();
        assert_eq!(guard.ensure(&registrar, "cadence"), RegistrationOutcome::Failed);
        assert_eq!(guard.ensure(&registrar, "cadence"), RegistrationOutcome::Skipped);
    }

    #[test]
    fn test_xdg_without_binary_fails_cleanly() {
        let registrar = XdgRegistrar {
            desktop_file: "cadence.desktop".to_owned(),
            binary: None,
        };
        assert!(matches!(
            registrar.is_default_handler("cadence"),
            Err(DeepLinkError::Registration(_))
        ));
        assert_eq!(
            HandlerRegistration::new().ensure(&registrar, "cadence"),
            RegistrationOutcome::Failed
        );
    }
}
