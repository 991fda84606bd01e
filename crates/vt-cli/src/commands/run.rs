//! The `vt run` command: wire collaborators together and track.

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::info;

use vt_core::{ChannelId, GuildId, TrackedChannel, tz};
use vt_db::{Database, SqliteLedger};

use crate::config::Config;
use crate::engine::{Engine, LogChannels};
use crate::transport;

/// Buffered transitions between the transport and the engine. The engine
/// drains one event fully before the next, so bursts queue here.
const CHANNEL_CAPACITY: usize = 256;

pub async fn run(config: Config) -> Result<()> {
    let offset = tz::offset_hours(config.utc_offset_hours)
        .context("utc_offset_hours is out of range")?;
    let tracked = TrackedChannel {
        guild_id: GuildId::new(config.guild_id).context("guild_id is not configured")?,
        channel_id: ChannelId::new(config.voice_channel_id)
            .context("voice_channel_id is not configured")?,
    };
    let channels = LogChannels {
        entry: ChannelId::new(config.entry_log_channel_id)
            .context("entry_log_channel_id is not configured")?,
        leave: ChannelId::new(config.leave_log_channel_id)
            .context("leave_log_channel_id is not configured")?,
        total_time: match config.total_time_channel_id {
            Some(id) if !id.is_empty() => Some(
                ChannelId::new(id).context("total_time_channel_id is invalid")?,
            ),
            _ => None,
        },
    };

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }
    let db = Database::open(&config.database_path).context("failed to open database")?;
    let ledger = SqliteLedger::new(db);

    let messenger = vt_discord::Client::new(config.token).context("invalid bot token")?;

    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    tokio::spawn(transport::read_stdin(tx));

    info!(
        guild = %tracked.guild_id,
        channel = %tracked.channel_id,
        "voice attendance tracker started"
    );
    Engine::new(ledger, messenger, tracked, offset, channels).run(rx).await;
    Ok(())
}
