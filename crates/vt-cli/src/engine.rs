//! The single-threaded attendance engine.
//!
//! Consumes voice-state transitions from a channel and runs each through
//! the pipeline: normalize, mutate presence, then the asynchronous tail
//! (ledger append, daily-total upsert, announcements).
//!
//! Per event, everything up to and including the presence mutation runs
//! before the first suspension point, so two transitions can never
//! interleave inside the session map. The loop also awaits each event's
//! tail before pulling the next, so ledger writes are observed in event
//! order. No error in the engine is fatal: persistence and notification
//! are best-effort downstream of the in-memory state.

use chrono::{DateTime, FixedOffset, Utc};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use vt_core::tracker::Accumulated;
use vt_core::{
    ChannelId, Fact, FactKind, Ledger, LogChannel, Messenger, Presence, TrackedChannel,
    VoiceTransition, duration, message, normalize, tz,
};

/// The configured destinations for each log-message class.
#[derive(Debug, Clone)]
pub struct LogChannels {
    pub entry: ChannelId,
    pub leave: ChannelId,
    /// Optional; when absent, cumulative-time announcements are
    /// suppressed and nothing else changes.
    pub total_time: Option<ChannelId>,
}

impl LogChannels {
    fn resolve(&self, kind: LogChannel) -> Option<&ChannelId> {
        match kind {
            LogChannel::Entry => Some(&self.entry),
            LogChannel::Leave => Some(&self.leave),
            LogChannel::TotalTime => self.total_time.as_ref(),
        }
    }
}

/// The voice-session tracking and duration-accounting engine.
///
/// Owns the in-memory [`Presence`] state; collaborators are injected so
/// tests can run against in-memory fakes.
pub struct Engine<L, M> {
    presence: Presence,
    ledger: L,
    messenger: M,
    tracked: TrackedChannel,
    offset: FixedOffset,
    channels: LogChannels,
}

impl<L: Ledger, M: Messenger> Engine<L, M> {
    pub fn new(
        ledger: L,
        messenger: M,
        tracked: TrackedChannel,
        offset: FixedOffset,
        channels: LogChannels,
    ) -> Self {
        Self {
            presence: Presence::new(),
            ledger,
            messenger,
            tracked,
            offset,
            channels,
        }
    }

    /// The in-memory presence state. Exposed for inspection in tests.
    #[must_use]
    pub const fn presence(&self) -> &Presence {
        &self.presence
    }

    /// Consumes transitions until the sending side closes.
    pub async fn run(mut self, mut rx: mpsc::Receiver<VoiceTransition>) {
        while let Some(transition) = rx.recv().await {
            self.handle(transition).await;
        }
        debug!("transition channel closed; engine stopping");
    }

    /// Handles one transition, stamping it with the current time.
    pub async fn handle(&mut self, transition: VoiceTransition) {
        self.handle_at(transition, Utc::now()).await;
    }

    /// Handles one transition observed at a given instant.
    pub async fn handle_at(&mut self, transition: VoiceTransition, observed_at: DateTime<Utc>) {
        let Some(fact) = normalize(&transition, &self.tracked, observed_at, self.offset) else {
            return;
        };
        debug!(user = %fact.user_id, kind = %fact.kind, "normalized transition");
        match fact.kind {
            FactKind::Joined => self.handle_join(fact).await,
            FactKind::Left => self.handle_leave(fact).await,
        }
    }

    async fn handle_join(&mut self, fact: Fact) {
        if let Some(previous) = self.presence.on_join(&fact.user_id, fact.timestamp) {
            warn!(
                user = %fact.user_id,
                previous = %previous.to_rfc3339(),
                "join while already present; session timestamp overwritten"
            );
        }

        self.append(&fact).await;
        self.announce(LogChannel::Entry, &message::format_join(&fact))
            .await;
    }

    async fn handle_leave(&mut self, fact: Fact) {
        // Synchronous head: session removal and accumulation both happen
        // before the first suspension point.
        let accumulated: Option<Accumulated> = match self.presence.on_leave(&fact.user_id) {
            Some(joined_at) => {
                Some(self.presence.accumulate(&fact.user_id, joined_at, fact.timestamp))
            }
            None => {
                warn!(
                    user = %fact.user_id,
                    "leave without tracked session; counting zero duration"
                );
                None
            }
        };
        if accumulated.is_some_and(|acc| acc.clamped) {
            warn!(
                user = %fact.user_id,
                "leave timestamp precedes join; duration clamped to zero"
            );
        }

        self.append(&fact).await;
        self.announce(LogChannel::Leave, &message::format_leave(&fact))
            .await;

        let Some(acc) = accumulated else {
            return;
        };

        let day = tz::day_of(fact.timestamp);
        if let Err(error) = self
            .ledger
            .upsert_daily_total(&fact.user_id, &fact.username, day, acc.cumulative_minutes)
            .await
        {
            warn!(user = %fact.user_id, %day, %error, "failed to upsert daily total");
        }

        let parts = duration::split_minutes(acc.cumulative_minutes);
        self.announce(LogChannel::TotalTime, &message::format_total(&fact.username, parts))
            .await;
    }

    async fn append(&self, fact: &Fact) {
        if let Err(error) = self.ledger.append_fact(fact).await {
            warn!(user = %fact.user_id, kind = %fact.kind, %error, "failed to append fact");
        }
    }

    async fn announce(&self, kind: LogChannel, text: &str) {
        let Some(channel) = self.channels.resolve(kind) else {
            debug!(%kind, "no channel configured; notification suppressed");
            return;
        };
        if let Err(error) = self.messenger.send(channel, text).await {
            warn!(%kind, channel = %channel, %error, "failed to send log message");
        }
    }
}
