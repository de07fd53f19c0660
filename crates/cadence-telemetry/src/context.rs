//! Per-request correlation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which entry point a request arrived through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// A request on the internal asset scheme.
    Asset,
    /// An external deep link handed over by the OS.
    DeepLink,
}

impl Channel {
    /// Name used in log fields.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::DeepLink => "deep_link",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of one asset request or deep-link dispatch.
///
/// Log lines emitted while the [`span`](Self::span) is entered carry the
/// request id, which keeps concurrent requests apart in the output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// Random id, unique per request.
    pub id: Uuid,
    /// Entry point.
    pub channel: Channel,
    /// Wall-clock arrival time.
    pub received_at: DateTime<Utc>,
}

impl RequestContext {
    /// Start tracking a request that just arrived on `channel`.
    #[must_use]
    pub fn new(channel: Channel) -> Self {
        Self {
            id: Uuid::new_v4(),
            channel,
            received_at: Utc::now(),
        }
    }

    /// Milliseconds since arrival.
    #[must_use]
    pub fn elapsed_ms(&self) -> i64 {
        Utc::now()
            .signed_duration_since(self.received_at)
            .num_milliseconds()
    }

    /// `info`-level span tagged with the request id and channel.
    #[must_use]
    pub fn span(&self) -> tracing::Span {
        tracing::info_span!("request", id = %self.id.simple(), channel = %self.channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_differ_per_request() {
        let a = RequestContext::new(Channel::Asset);
        let b = RequestContext::new(Channel::Asset);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_elapsed_grows() {
        let ctx = RequestContext::new(Channel::DeepLink);
        std::thread::sleep(std::time::Duration::from_millis(10));
        assert!(ctx.elapsed_ms() >= 10);
    }

    #[test]
    fn test_channel_names() {
        assert_eq!(Channel::Asset.to_string(), "asset");
        assert_eq!(
            serde_json::to_string(&Channel::DeepLink).unwrap(),
            "\"deep_link\""
        );
    }
}
