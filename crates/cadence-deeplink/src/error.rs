use thiserror::Error;

/// Reasons a deep link could not be turned into a command, plus failures of
/// the collaborators the dispatcher talks to.
///
/// None of these escape [`DeepLinkDispatcher::handle`](crate::DeepLinkDispatcher::handle):
/// the dispatcher records them in its outcome and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeepLinkError {
    /// The URI has no `://` separator.
    #[error("deep link has no scheme separator")]
    MissingScheme,

    /// The URI uses a scheme other than the one this client handles.
    #[error("expected scheme '{expected}', got '{found}'")]
    SchemeMismatch {
        /// Scheme the dispatcher accepts.
        expected: String,
        /// Scheme found in the URI.
        found: String,
    },

    /// Nothing follows the scheme separator.
    #[error("deep link has no path segments")]
    Empty,

    /// The first segment names no known verb.
    #[error("unknown verb '{0}'")]
    UnknownVerb(String),

    /// A verb is missing a required argument.
    #[error("verb '{verb}' requires argument '{argument}'")]
    MissingArgument {
        /// The verb.
        verb: &'static str,
        /// Name of the missing argument.
        argument: &'static str,
    },

    /// An argument has characters outside the allowed set.
    #[error("argument '{argument}' has an invalid value")]
    InvalidArgument {
        /// Name of the offending argument.
        argument: &'static str,
    },

    /// A segment is not valid percent-encoded UTF-8.
    #[error("segment is not valid UTF-8: {0}")]
    Decode(String),

    /// The UI surface refused or failed to take a command.
    #[error("ui surface error: {0}")]
    Surface(String),

    /// OS default-handler registration failed.
    #[error("handler registration failed: {0}")]
    Registration(String),
}

/// Result type for deep-link operations.
pub type DeepLinkResult<T> = Result<T, DeepLinkError>;
