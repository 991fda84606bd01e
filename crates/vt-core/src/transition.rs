//! Raw voice-state transitions as delivered by the transport.

use serde::{Deserialize, Serialize};

use crate::types::{ChannelId, GuildId, UserId};

/// A single before/after voice membership change for one user.
///
/// This is the inbound wire type: the transport pushes one of these per
/// gateway voice-state update. Either channel may be absent (`null`) when
/// the user was not, or is no longer, in any voice channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceTransition {
    pub user_id: UserId,
    pub username: String,
    /// The channel the user was in before the change, if any.
    #[serde(default)]
    pub previous_channel_id: Option<ChannelId>,
    /// The channel the user is in after the change, if any.
    #[serde(default)]
    pub current_channel_id: Option<ChannelId>,
    pub guild_id: GuildId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_deserializes_with_null_channels() {
        let json = r#"{
            "user_id": "100",
            "username": "mhai",
            "previous_channel_id": "555",
            "current_channel_id": null,
            "guild_id": "900"
        }"#;
        let t: VoiceTransition = serde_json::from_str(json).unwrap();
        assert_eq!(t.previous_channel_id.unwrap().as_str(), "555");
        assert!(t.current_channel_id.is_none());
    }

    #[test]
    fn transition_deserializes_with_missing_channels() {
        let json = r#"{"user_id": "100", "username": "mhai", "guild_id": "900"}"#;
        let t: VoiceTransition = serde_json::from_str(json).unwrap();
        assert!(t.previous_channel_id.is_none());
        assert!(t.current_channel_id.is_none());
    }

    #[test]
    fn transition_rejects_empty_user_id() {
        let json = r#"{"user_id": "", "username": "x", "guild_id": "900"}"#;
        let result: Result<VoiceTransition, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
