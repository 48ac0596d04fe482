use std::collections::VecDeque;
use std::time::Duration;

use lockrelay::bail;
use lockrelay::error::{ErrorKind, RelayResult};
use lockrelay::messaging::{CommandSource, InboundCommand, Messenger, OutboundMessage, ParseMode};
use lockrelay::relay_error;
use lockrelay_config::shared::TelegramConfig;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::telegram::types::{
    ApiResponse, GetUpdatesRequest, Message, SendMessageRequest, Update,
};

/// Update kinds requested from `getUpdates`.
const ALLOWED_UPDATES: &[&str] = &["message"];

/// Thin client over the Bot API methods used by the relay.
///
/// Implements [`Messenger`] through `sendMessage`. Every delivery is a single request, failures
/// are not retried.
#[derive(Debug, Clone)]
pub struct TelegramClient {
    client: reqwest::Client,
    api_url: String,
    token: SecretString,
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig) -> RelayResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|err| {
                relay_error!(
                    ErrorKind::ConfigError,
                    "Failed to build the Telegram HTTP client",
                    err.without_url()
                )
            })?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_url, self.token.expose_secret())
    }

    /// Fetches updates after `offset`, waiting up to `timeout` for one to arrive.
    pub async fn get_updates(&self, offset: i64, timeout: Duration) -> RelayResult<Vec<Update>> {
        let request = GetUpdatesRequest {
            offset,
            timeout: timeout.as_secs(),
            allowed_updates: ALLOWED_UPDATES,
        };

        let response = self
            .client
            .post(self.method_url("getUpdates"))
            // The long poll itself may take `timeout`, the client timeout covers the rest.
            .timeout(timeout + Duration::from_secs(10))
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                relay_error!(
                    ErrorKind::CommandSourceFailed,
                    "Failed to poll Telegram updates",
                    err.without_url()
                )
            })?;

        read_result(response, ErrorKind::CommandSourceFailed, "Failed to poll Telegram updates")
            .await
    }
}

/// Decodes a Bot API response, mapping any failure to an error of `kind`.
async fn read_result<T>(
    response: reqwest::Response,
    kind: ErrorKind,
    description: &'static str,
) -> RelayResult<T>
where
    T: DeserializeOwned,
{
    let status = response.status();
    let body: ApiResponse<T> = response.json().await.map_err(|err| {
        relay_error!(
            kind,
            description,
            format!("unreadable response with status {status}: {}", err.without_url())
        )
    })?;

    if !body.ok || status != StatusCode::OK {
        bail!(
            kind,
            description,
            format!(
                "status {status}, error code {}: {}",
                body.error_code.unwrap_or_default(),
                body.description.as_deref().unwrap_or("no description")
            )
        );
    }

    match body.result {
        Some(result) => Ok(result),
        None => bail!(kind, description, "response has no result"),
    }
}

impl Messenger for TelegramClient {
    async fn send(&self, message: OutboundMessage) -> RelayResult<()> {
        let parse_mode = match message.parse_mode {
            ParseMode::Plain => None,
            ParseMode::MarkdownV2 => Some("MarkdownV2"),
        };
        let request = SendMessageRequest {
            chat_id: message.destination.as_str(),
            text: &message.text,
            parse_mode,
        };

        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                relay_error!(
                    ErrorKind::DeliveryFailed,
                    "Failed to send Telegram message",
                    err.without_url()
                )
            })?;

        let _sent: serde_json::Value = read_result(
            response,
            ErrorKind::DeliveryFailed,
            "Failed to send Telegram message",
        )
        .await?;

        debug!(destination = %message.destination, "telegram message sent");

        Ok(())
    }
}

/// Long-polling command stream over `getUpdates`.
///
/// Acknowledges updates by advancing the offset past the last update received, so every update
/// is yielded at most once. Updates that are not `/commands` are skipped. The stream never ends
/// on its own.
#[derive(Debug)]
pub struct TelegramUpdates {
    client: TelegramClient,
    poll_timeout: Duration,
    offset: i64,
    pending: VecDeque<InboundCommand>,
}

impl TelegramUpdates {
    pub fn new(client: TelegramClient, poll_timeout: Duration) -> Self {
        Self {
            client,
            poll_timeout,
            offset: 0,
            pending: VecDeque::new(),
        }
    }
}

impl CommandSource for TelegramUpdates {
    async fn next_command(&mut self) -> RelayResult<Option<InboundCommand>> {
        loop {
            if let Some(command) = self.pending.pop_front() {
                return Ok(Some(command));
            }

            let updates = self
                .client
                .get_updates(self.offset, self.poll_timeout)
                .await?;

            for update in updates {
                self.offset = self.offset.max(update.update_id + 1);
                if let Some(command) = update.message.and_then(Message::into_command) {
                    self.pending.push_back(command);
                }
            }

            if !self.pending.is_empty() {
                info!(
                    count = self.pending.len(),
                    offset = self.offset,
                    "received telegram commands"
                );
            }
        }
    }
}
