use lockrelay_config::Config;
use lockrelay_config::shared::{RelayConfig, StoreConfig, TelegramConfig, ValidationError};
use serde::Deserialize;

/// Complete configuration of the relay service.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// HTTP server settings.
    pub application: ApplicationSettings,
    /// Where server status rows live.
    pub store: StoreConfig,
    /// Transport independent relay behavior.
    #[serde(default)]
    pub relay: RelayConfig,
    /// Telegram Bot API settings.
    pub telegram: TelegramConfig,
}

impl Config for ServiceConfig {
    const LIST_PARSE_KEYS: &'static [&'static str] = &["store.seed_servers"];

    fn validate(&self) -> Result<(), ValidationError> {
        self.application.validate()?;
        self.store.validate()?;
        self.relay.validate()?;
        self.telegram.validate()
    }
}

/// Largest request body accepted on `/hook`, matching the largest push payload GitHub sends.
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 25 * 1024 * 1024;

fn default_max_payload_bytes() -> usize {
    DEFAULT_MAX_PAYLOAD_BYTES
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    /// Request body limit for inbound push events.
    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: usize,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_payload_bytes == 0 {
            return Err(ValidationError::PayloadLimitZero);
        }

        Ok(())
    }
}

/// The part of the configuration needed by the `migrate` command.
///
/// Loaded separately so migrations can run without messaging credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct MigrateConfig {
    pub store: StoreConfig,
}

impl Config for MigrateConfig {
    const LIST_PARSE_KEYS: &'static [&'static str] = &["store.seed_servers"];

    fn validate(&self) -> Result<(), ValidationError> {
        self.store.validate()
    }
}
