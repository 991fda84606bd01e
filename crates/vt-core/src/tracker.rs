//! In-memory presence tracking and duration accounting.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};

use crate::types::UserId;

/// Result of folding one completed session into a user's running total.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Accumulated {
    /// The user's cumulative presence for this process lifetime, in
    /// fractional minutes. This is the value the ledger persists.
    pub cumulative_minutes: f64,
    /// Set when the leave timestamp preceded the join timestamp and the
    /// elapsed time was clamped to zero.
    pub clamped: bool,
}

/// Open sessions and running totals for the current process lifetime.
///
/// Explicitly owned state: created at startup, dropped at shutdown, fresh
/// per test. Sessions are not persisted; a restart mid-session silently
/// drops the open session and the running totals, after which the stored
/// daily totals are the sole record of past accumulation. The process
/// does not re-read them on startup.
#[derive(Debug, Default)]
pub struct Presence {
    sessions: HashMap<UserId, DateTime<FixedOffset>>,
    running_minutes: HashMap<UserId, f64>,
}

impl Presence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a join, returning the previous join timestamp if the user
    /// already had an open session.
    ///
    /// A stale entry is overwritten rather than rejected; a `Some` return
    /// is the join-over-active-session anomaly and is the caller's to log.
    pub fn on_join(
        &mut self,
        user: &UserId,
        joined_at: DateTime<FixedOffset>,
    ) -> Option<DateTime<FixedOffset>> {
        self.sessions.insert(user.clone(), joined_at)
    }

    /// Removes and returns the user's open session, if any.
    ///
    /// `None` is not an error: a leave with no tracked join legitimately
    /// occurs when the process restarted mid-session.
    pub fn on_leave(&mut self, user: &UserId) -> Option<DateTime<FixedOffset>> {
        self.sessions.remove(user)
    }

    /// True if the user currently has an open session.
    #[must_use]
    pub fn is_present(&self, user: &UserId) -> bool {
        self.sessions.contains_key(user)
    }

    /// Folds a completed session into the user's running total.
    ///
    /// Elapsed time is kept in fractional minutes at this stage; whole
    /// hours/minutes/seconds are only produced when the ledger persists
    /// the total. A leave that precedes its join contributes zero and is
    /// flagged via [`Accumulated::clamped`].
    #[expect(
        clippy::cast_precision_loss,
        reason = "session lengths are far below 2^52 ms"
    )]
    pub fn accumulate(
        &mut self,
        user: &UserId,
        joined_at: DateTime<FixedOffset>,
        left_at: DateTime<FixedOffset>,
    ) -> Accumulated {
        let elapsed_ms = (left_at - joined_at).num_milliseconds();
        let clamped = elapsed_ms < 0;
        let minutes = if clamped {
            0.0
        } else {
            elapsed_ms as f64 / 60_000.0
        };

        let total = self.running_minutes.entry(user.clone()).or_insert(0.0);
        *total += minutes;
        Accumulated {
            cumulative_minutes: *total,
            clamped,
        }
    }

    /// The user's cumulative minutes so far, if any session has completed.
    #[must_use]
    pub fn running_minutes(&self, user: &UserId) -> Option<f64> {
        self.running_minutes.get(user).copied()
    }
}
