//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use vt_core::tz;

/// Application configuration.
///
/// The identifier fields are Discord snowflakes; they stay strings here
/// and are validated into typed IDs when the engine is built.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Bot token used for outbound channel messages.
    pub token: String,
    /// The guild whose voice channel is tracked.
    pub guild_id: String,
    /// The tracked voice channel.
    pub voice_channel_id: String,
    /// Text channel receiving join announcements.
    pub entry_log_channel_id: String,
    /// Text channel receiving leave announcements.
    pub leave_log_channel_id: String,
    /// Text channel receiving cumulative-time announcements. Absence
    /// suppresses that notification class only.
    pub total_time_channel_id: Option<String>,
    /// Path to the database file.
    pub database_path: PathBuf,
    /// Reference timezone as whole hours east of UTC.
    pub utc_offset_hours: i32,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &"[REDACTED]")
            .field("guild_id", &self.guild_id)
            .field("voice_channel_id", &self.voice_channel_id)
            .field("entry_log_channel_id", &self.entry_log_channel_id)
            .field("leave_log_channel_id", &self.leave_log_channel_id)
            .field("total_time_channel_id", &self.total_time_channel_id)
            .field("database_path", &self.database_path)
            .field("utc_offset_hours", &self.utc_offset_hours)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            token: String::new(),
            guild_id: String::new(),
            voice_channel_id: String::new(),
            entry_log_channel_id: String::new(),
            leave_log_channel_id: String::new(),
            total_time_channel_id: None,
            database_path: data_dir.join("vt.db"),
            utc_offset_hours: tz::DEFAULT_OFFSET_HOURS,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (VT_*)
        figment = figment.merge(Env::prefixed("VT_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for vt.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("vt"))
}

/// Returns the platform-specific data directory for vt.
///
/// On Linux: `~/.local/share/vt`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("vt"))
}
