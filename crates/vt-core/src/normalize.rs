//! Event normalization: raw transitions to typed facts.

use chrono::{DateTime, FixedOffset, Utc};

use crate::fact::{Fact, FactKind};
use crate::transition::VoiceTransition;
use crate::types::{ChannelId, GuildId};
use crate::tz;

/// The guild and voice channel whose membership is being tracked.
#[derive(Debug, Clone)]
pub struct TrackedChannel {
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
}

impl TrackedChannel {
    fn is_tracked(&self, channel: Option<&ChannelId>) -> bool {
        channel == Some(&self.channel_id)
    }
}

/// Produces zero or one fact from a raw voice-state transition.
///
/// - `Joined` when the after-channel is the tracked channel and differs
///   from the before-channel (including from no channel at all).
/// - `Left` when the before-channel is the tracked channel and the user
///   ended up in no channel.
/// - Nothing for transitions between other channels or for state changes
///   that never touch the tracked channel (mute/camera toggles arrive as
///   transitions with identical channels on both sides).
///
/// Transitions for a different guild are ignored entirely. The
/// observation time is converted to the reference offset before it enters
/// the fact. Pure function of its inputs.
#[must_use]
pub fn normalize(
    transition: &VoiceTransition,
    tracked: &TrackedChannel,
    observed_at: DateTime<Utc>,
    offset: FixedOffset,
) -> Option<Fact> {
    if transition.guild_id != tracked.guild_id {
        return None;
    }

    let before = transition.previous_channel_id.as_ref();
    let after = transition.current_channel_id.as_ref();

    let kind = if tracked.is_tracked(after) && before != after {
        FactKind::Joined
    } else if tracked.is_tracked(before) && after.is_none() {
        FactKind::Left
    } else {
        return None;
    };

    Some(Fact {
        user_id: transition.user_id.clone(),
        username: transition.username.clone(),
        kind,
        timestamp: tz::to_reference(observed_at, offset),
    })
}
