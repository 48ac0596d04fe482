//! Process hosting the lock relay.
//!
//! Wires the relay core to its transports: an actix-web server receiving push events, and the
//! Telegram Bot API for commands and notifications.

pub mod config;
pub mod core;
pub mod error;
pub mod routes;
pub mod startup;
pub mod telegram;
