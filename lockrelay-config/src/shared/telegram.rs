use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::shared::ValidationError;

const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Connection settings for the Telegram Bot API.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    /// Base URL of the Bot API, overridable for tests and self-hosted API servers.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Bot token issued by BotFather.
    pub token: SecretString,
    /// Long-polling timeout passed to `getUpdates`.
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,
    /// Timeout applied to `sendMessage` calls.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl TelegramConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.token.expose_secret().is_empty() {
            return Err(ValidationError::EmptyTelegramToken);
        }
        if self.poll_timeout_secs == 0 {
            return Err(ValidationError::PollTimeoutZero);
        }

        Ok(())
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

const fn default_poll_timeout_secs() -> u64 {
    60
}

const fn default_request_timeout_secs() -> u64 {
    10
}
