//! Deep-link grammar: `<scheme>://<verb>/<arg>/<arg>...`.
//!
//! Parsing is deliberately forgiving about layout and strict about
//! content. Query strings, fragments and empty segments are ignored, verbs
//! match case-insensitively, and every argument is percent-decoded before it
//! is checked against the verb's argument table.

use std::fmt;

use crate::error::{DeepLinkError, DeepLinkResult};
use crate::navigation::{NavigationCommand, WatchEndpoint};

/// Longest argument accepted, after decoding.
pub const MAX_ARG_LEN: usize = 128;

/// The verb table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// `play/<videoId>[/<playlistId>]`
    Play,
}

impl Verb {
    /// Every defined verb.
    pub const ALL: [Verb; 1] = [Verb::Play];

    /// Segment that selects this verb.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Verb::Play => "play",
        }
    }

    /// Look up a verb by its segment, ignoring ASCII case.
    #[must_use]
    pub fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|verb| verb.as_str().eq_ignore_ascii_case(segment))
    }

    /// Argument names in order. The first `required` are mandatory.
    #[must_use]
    pub const fn arguments(self) -> &'static [&'static str] {
        match self {
            Verb::Play => &["videoId", "playlistId"],
        }
    }

    /// How many leading arguments must be present.
    #[must_use]
    pub const fn required(self) -> usize {
        match self {
            Verb::Play => 1,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed deep link.
///
/// `args` holds only the arguments the verb defines; extra trailing
/// segments are dropped during parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepLinkCommand {
    /// The verb.
    pub verb: Verb,
    /// Decoded arguments, in order.
    pub args: Vec<String>,
}

impl DeepLinkCommand {
    /// Parse an external URI.
    ///
    /// With `expected_scheme` set, the URI's scheme must match it (ASCII
    /// case-insensitive).
    ///
    /// # Errors
    ///
    /// Every variant of [`DeepLinkError`] that describes input shape:
    /// missing scheme separator, wrong scheme, no segments, unknown verb,
    /// missing or invalid arguments, or undecodable segments.
    pub fn parse(uri: &str, expected_scheme: Option<&str>) -> DeepLinkResult<Self> {
        let (scheme, rest) = uri.trim().split_once("://").ok_or(DeepLinkError::MissingScheme)?;

        if let Some(expected) = expected_scheme
            && !scheme.eq_ignore_ascii_case(expected)
        {
            return Err(DeepLinkError::SchemeMismatch {
                expected: expected.to_owned(),
                found: scheme.to_owned(),
            });
        }

        let path = rest
            .split(['?', '#'])
            .next()
            .unwrap_or_default();

        let mut segments = path.split('/').filter(|s| !s.is_empty());

        let verb_segment = segments.next().ok_or(DeepLinkError::Empty)?;
        let verb_segment = decode(verb_segment)?;
        let verb = Verb::from_segment(&verb_segment)
            .ok_or(DeepLinkError::UnknownVerb(verb_segment))?;

        let names = verb.arguments();
        let args = segments
            .take(names.len())
            .map(decode)
            .collect::<DeepLinkResult<Vec<_>>>()?;

        if let Some(missing) = names.get(args.len()..verb.required()).and_then(|m| m.first()) {
            return Err(DeepLinkError::MissingArgument {
                verb: verb.as_str(),
                argument: *missing,
            });
        }

        for (name, value) in names.iter().zip(&args) {
            if !is_valid_arg(value) {
                return Err(DeepLinkError::InvalidArgument { argument: *name });
            }
        }

        Ok(Self { verb, args })
    }

    /// The navigation this command asks the UI surface to perform.
    #[must_use]
    pub fn navigation(&self) -> NavigationCommand {
        match self.verb {
            Verb::Play => NavigationCommand::Navigate {
                watch_endpoint: WatchEndpoint {
                    video_id: self.args.first().cloned().unwrap_or_default(),
                    playlist_id: self.args.get(1).cloned(),
                },
            },
        }
    }
}

fn decode(segment: &str) -> DeepLinkResult<String> {
    urlencoding::decode(segment)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| DeepLinkError::Decode(e.to_string()))
}

/// Characters that would let a decoded argument act as a path separator or
/// markup in the surface.
const FORBIDDEN_ARG_CHARS: &[char] = &['/', '\\', '<', '>', '"', '\'', '`'];

/// Identifiers are opaque: anything printable, bounded in length, with no
/// whitespace or [`FORBIDDEN_ARG_CHARS`].
fn is_valid_arg(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= MAX_ARG_LEN
        && !value
            .chars()
            .any(|c| c.is_control() || c.is_whitespace() || FORBIDDEN_ARG_CHARS.contains(&c))
}
