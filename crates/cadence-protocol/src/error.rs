//! Errors from setting up the asset scheme and from parsing its requests.

use thiserror::Error;

use crate::root::RootSpec;

/// Errors raised while wiring up the asset scheme.
///
/// Rejected requests are not errors: the router answers them with a
/// `403 Policy Violation` response. These variants cover malformed input
/// at the URI boundary and programming mistakes during startup.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The router was initialized a second time.
    #[error("resource router for scheme '{scheme}' is already initialized")]
    AlreadyInitialized {
        /// Scheme the router is bound to.
        scheme: String,
    },

    /// The router was initialized before its scheme was declared privileged.
    #[error("scheme '{scheme}' must be registered as standard and secure before initialization")]
    SchemeNotPrivileged {
        /// Scheme that was not declared.
        scheme: String,
    },

    /// A different scheme was already declared privileged.
    #[error("scheme '{registered}' is already registered; refusing to register '{requested}'")]
    SchemeConflict {
        /// Scheme already in the registry.
        registered: String,
        /// Scheme passed to the second registration.
        requested: String,
    },

    /// A root table was built without one of the required roots.
    #[error("no base directory configured for root '{0}'")]
    MissingRoot(RootSpec),

    /// A root base directory is unusable.
    #[error("invalid base directory for root '{root}': {reason}")]
    InvalidRoot {
        /// The offending root.
        root: RootSpec,
        /// Why the directory was refused.
        reason: String,
    },

    /// A request URI could not be parsed.
    #[error("malformed resource request: {0}")]
    MalformedRequest(String),

    /// A request arrived on a scheme this router does not serve.
    #[error("expected scheme '{expected}', got '{found}'")]
    SchemeMismatch {
        /// Scheme the router serves.
        expected: String,
        /// Scheme of the request.
        found: String,
    },
}

/// Result type for protocol setup operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;
