//! Outbound log-message formatting.
//!
//! Messages are code-fenced, matching what the bot has always posted to
//! its log channels.

use std::fmt;

use crate::duration::DurationParts;
use crate::fact::Fact;

/// The class of log channel a message is destined for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogChannel {
    /// Join announcements.
    Entry,
    /// Leave announcements.
    Leave,
    /// Cumulative-time announcements. Optional in configuration.
    TotalTime,
}

impl LogChannel {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Entry => "entry-log",
            Self::Leave => "leave-log",
            Self::TotalTime => "total-time-log",
        }
    }
}

impl fmt::Display for LogChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Formats the join announcement for a fact.
#[must_use]
pub fn format_join(fact: &Fact) -> String {
    format!(
        "```User {} joined the voice channel at {}```",
        fact.username,
        fact.timestamp.to_rfc3339()
    )
}

/// Formats the leave announcement for a fact.
#[must_use]
pub fn format_leave(fact: &Fact) -> String {
    format!(
        "```User {} left the voice channel at {}```",
        fact.username,
        fact.timestamp.to_rfc3339()
    )
}

/// Formats the cumulative-time announcement.
#[must_use]
pub fn format_total(username: &str, parts: DurationParts) -> String {
    format!(
        "```User {username} spent a total of {} hours, {} minutes, {} seconds in the voice channel.```",
        parts.hours, parts.minutes, parts.seconds
    )
}
