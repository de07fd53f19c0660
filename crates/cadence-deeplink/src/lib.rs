//! Cadence Deep Link - external command URIs.
//!
//! The OS hands the client URIs like `cadence://play/abc123/def456`. This
//! crate parses them into a [`DeepLinkCommand`], turns the command into a
//! [`NavigationCommand`], and delivers it to a [`UiSurface`] once the
//! surface is ready.
//!
//! External input is untrusted: anything malformed is ignored, and links
//! that arrive before the surface exists are dropped rather than queued.
//! [`DeepLinkDispatcher::handle`] reports what happened as a
//! [`DispatchOutcome`] and never fails.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

/// Deep-link grammar and verb table.
pub mod command;
/// Dispatch to the UI surface.
pub mod dispatcher;
/// Error types.
pub mod error;
/// UI-bound payloads.
pub mod navigation;
/// OS default-handler registration.
pub mod registration;
/// The UI surface interface.
pub mod surface;

pub use command::{DeepLinkCommand, MAX_ARG_LEN, Verb};
pub use dispatcher::{DeepLinkDispatcher, DispatchOutcome, DropReason};
pub use error::{DeepLinkError, DeepLinkResult};
pub use navigation::{NavigationCommand, WatchEndpoint};
pub use registration::{HandlerRegistration, RegistrationOutcome, SchemeRegistrar, XdgRegistrar};
pub use surface::{SurfaceReadiness, SurfaceState, UiSurface};
