//! Core domain logic for the voice attendance tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Normalization: turning raw voice-state transitions into join/leave facts
//! - Presence: tracking open sessions and accumulating per-user durations
//! - Day bucketing: assigning facts to calendar days in a fixed reference timezone
//! - Collaborator traits: the `Ledger` and `Messenger` boundaries

pub mod duration;
pub mod fact;
pub mod ledger;
pub mod message;
pub mod normalize;
pub mod notify;
pub mod tracker;
pub mod transition;
pub mod tz;
pub mod types;

pub use duration::DurationParts;
pub use fact::{Fact, FactKind};
pub use ledger::{DailyTotal, Ledger};
pub use message::LogChannel;
pub use normalize::{TrackedChannel, normalize};
pub use notify::Messenger;
pub use tracker::{Accumulated, Presence};
pub use transition::VoiceTransition;
pub use types::{ChannelId, GuildId, UserId, ValidationError};
