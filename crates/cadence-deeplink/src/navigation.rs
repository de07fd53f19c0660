//! Payloads sent to the UI surface.

use serde::{Deserialize, Serialize};

/// A command for the UI surface.
///
/// Serialized as `{"kind":"navigate","watchEndpoint":{...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NavigationCommand {
    /// Open the watch page.
    #[serde(rename_all = "camelCase")]
    Navigate {
        /// What to open.
        watch_endpoint: WatchEndpoint,
    },
}

/// Target of a watch navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchEndpoint {
    /// Content to play.
    pub video_id: String,
    /// Playlist to play it in, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlist_id: Option<String>,
}

impl NavigationCommand {
    /// Serialize for a message channel to the UI.
    ///
    /// # Errors
    ///
    /// Returns the serializer error; cannot happen for this type in practice.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_shape_with_playlist() {
        let cmd = NavigationCommand::Navigate {
            watch_endpoint: WatchEndpoint {
                video_id: "abc123".to_owned(),
                playlist_id: Some("def456".to_owned()),
            },
        };
        let value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(
            value,
            json!({
                "kind": "navigate",
                "watchEndpoint": { "videoId": "abc123", "playlistId": "def456" }
            })
        );
    }

    #[test]
    fn test_playlist_omitted_when_absent() {
        let cmd = NavigationCommand::Navigate {
            watch_endpoint: WatchEndpoint {
                video_id: "abc123".to_owned(),
                playlist_id: None,
            },
        };
        let text = cmd.to_json().unwrap();
        assert!(!text.contains("playlistId"), "{text}");

        let back: NavigationCommand = serde_json::from_str(&text).unwrap();
        assert_eq!(back, cmd);
    }
}
