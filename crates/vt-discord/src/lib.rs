//! Discord REST integration for the voice attendance tracker.
//!
//! The bot only ever needs one outbound capability: posting a text
//! message to a channel. This crate wraps that single endpoint
//! (`POST /channels/{id}/messages`) and implements the core
//! [`Messenger`] trait on top of it.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use vt_core::{ChannelId, Messenger};

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DISCORD_API_URL: &str = "https://discord.com/api/v10";

/// Discord API client errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The provided bot token was invalid.
    #[error("invalid bot token: {reason}")]
    InvalidToken { reason: &'static str },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// API returned an error response.
    #[error("API error for channel {channel}: {message}")]
    Api { channel: String, message: String },
}

/// Discord REST client.
///
/// # Thread Safety
///
/// The client is safe to clone and share across threads. Each clone
/// shares the underlying HTTP connection pool.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    token: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a new client with the given bot token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty or whitespace-only, or if
    /// the HTTP client fails to build.
    pub fn new(token: impl Into<String>) -> Result<Self, ApiError> {
        let token = token.into();

        if token.is_empty() {
            return Err(ApiError::InvalidToken {
                reason: "bot token cannot be empty",
            });
        }
        if token.trim().is_empty() {
            return Err(ApiError::InvalidToken {
                reason: "bot token cannot be whitespace-only",
            });
        }

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(ApiError::ClientBuild)?;

        Ok(Self { http, token })
    }

    /// Posts a text message to a channel.
    pub async fn send_message(&self, channel: &ChannelId, content: &str) -> Result<(), ApiError> {
        let url = format!("{DISCORD_API_URL}/channels/{channel}/messages");
        let request = CreateMessage { content };

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bot {}", self.token))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = parse_error_message(&body)
                .unwrap_or_else(|| format!("status {status}: {body}"));
            return Err(ApiError::Api {
                channel: channel.to_string(),
                message,
            });
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Messenger for Client {
    async fn send(&self, channel: &ChannelId, text: &str) -> anyhow::Result<()> {
        self.send_message(channel, text).await?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct CreateMessage<'a> {
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: String,
}

/// Extracts Discord's `message` field from an error body, if present.
fn parse_error_message(body: &str) -> Option<String> {
    let parsed: ErrorResponse = serde_json::from_str(body).ok()?;
    Some(parsed.message)
}
