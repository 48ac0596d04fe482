//! Contracts between the relay and the external messaging client.
//!
//! The relay never talks to a chat platform directly. Outbound text goes through a
//! [`Messenger`], inbound commands come from a [`CommandSource`]. Both are implemented by the
//! service crate on top of the Telegram Bot API and by the in-memory doubles in `test_utils`.

use std::future::Future;

use crate::error::RelayResult;
use crate::types::Destination;

pub mod format;

/// Markup dialect a message body is written in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    #[default]
    Plain,
    MarkdownV2,
}

impl ParseMode {
    pub fn as_static_str(&self) -> &'static str {
        match self {
            ParseMode::Plain => "plain",
            ParseMode::MarkdownV2 => "markdown_v2",
        }
    }
}

/// A message ready to be delivered to a destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub destination: Destination,
    pub text: String,
    pub parse_mode: ParseMode,
}

impl OutboundMessage {
    pub fn plain(destination: Destination, text: impl Into<String>) -> Self {
        Self {
            destination,
            text: text.into(),
            parse_mode: ParseMode::Plain,
        }
    }

    pub fn markdown(destination: Destination, text: impl Into<String>) -> Self {
        Self {
            destination,
            text: text.into(),
            parse_mode: ParseMode::MarkdownV2,
        }
    }
}

/// Delivers messages to destinations.
///
/// Every call is a single attempt. A failure is reported to the caller, which decides whether it
/// is fatal.
pub trait Messenger {
    fn send(&self, message: OutboundMessage) -> impl Future<Output = RelayResult<()>> + Send;
}

/// A command received from a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundCommand {
    /// Command word without any leading `/` or `@botname` suffix.
    pub word: String,
    /// Free text following the command word, possibly empty.
    pub argument: String,
    /// Display name of the sender.
    pub actor: String,
    /// Where replies to this command go.
    pub reply_to: Destination,
}

/// Stream of inbound commands.
pub trait CommandSource {
    /// Waits for the next command. Returns `None` once the stream has ended.
    fn next_command(
        &mut self,
    ) -> impl Future<Output = RelayResult<Option<InboundCommand>>> + Send;
}
