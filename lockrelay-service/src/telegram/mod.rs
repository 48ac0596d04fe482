//! Telegram Bot API client implementing the relay's messaging contracts.

mod client;
mod types;

pub use client::{TelegramClient, TelegramUpdates};
pub use types::{Chat, Message, Update, User, parse_command};
