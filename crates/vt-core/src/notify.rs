//! The messaging collaborator boundary.

use anyhow::Result;

use crate::types::ChannelId;

/// Sends formatted text to externally configured channels.
///
/// Notification is best-effort: a missing channel or rejected send is
/// logged by the caller and swallowed, never escalated into the ledger
/// or session-state path.
#[async_trait::async_trait]
pub trait Messenger: Send + Sync {
    async fn send(&self, channel: &ChannelId, text: &str) -> Result<()>;
}
