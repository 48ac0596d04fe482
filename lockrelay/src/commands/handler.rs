use metrics::counter;
use tracing::{debug, info};

use crate::commands::Command;
use crate::error::RelayResult;
use crate::messaging::{CommandSource, InboundCommand, Messenger, OutboundMessage, format};
use crate::metrics::{COMMAND_LABEL, LOCKRELAY_COMMANDS_RECEIVED_TOTAL};
use crate::store::StatusStore;
use crate::types::{Destination, ServerStatus};

/// Reason given when a command needs a server name and none was supplied.
const NO_SERVER_SPECIFIED: &str = "no server specified";

/// Answers user commands from the store.
///
/// Commands are processed one at a time. Any store or reply failure is returned to the caller,
/// which escalates it.
#[derive(Debug, Clone)]
pub struct CommandHandler<S, M> {
    store: S,
    messenger: M,
}

impl<S, M> CommandHandler<S, M>
where
    S: StatusStore,
    M: Messenger,
{
    pub fn new(store: S, messenger: M) -> Self {
        Self { store, messenger }
    }

    /// Reads and handles commands until the source ends or an error occurs.
    pub async fn run<C>(self, mut source: C) -> RelayResult<()>
    where
        C: CommandSource,
    {
        info!("starting command handler");

        while let Some(command) = source.next_command().await? {
            self.handle(&command).await?;
        }

        info!("command source ended");

        Ok(())
    }

    /// Handles a single command to completion.
    pub async fn handle(&self, command: &InboundCommand) -> RelayResult<()> {
        info!("[{}] {} {}", command.actor, command.word, command.argument);

        let parsed = Command::parse(&command.word, &command.argument);
        counter!(
            LOCKRELAY_COMMANDS_RECEIVED_TOTAL,
            COMMAND_LABEL => parsed.as_static_str()
        )
        .increment(1);

        let reply_to = &command.reply_to;
        match parsed {
            Command::Status(Some(name)) => self.reply_status(&name, reply_to).await,
            Command::Status(None) => self.reply_subscribed_statuses(reply_to).await,
            Command::Subscribe(Some(name)) => self.subscribe(&name, reply_to).await,
            Command::Subscribe(None) => {
                self.reply(OutboundMessage::plain(
                    reply_to.clone(),
                    format::usage_error(NO_SERVER_SPECIFIED),
                ))
                .await
            }
            Command::Help => {
                self.reply(OutboundMessage::plain(reply_to.clone(), format::HELP_TEXT))
                    .await
            }
            Command::Unknown => {
                debug!(word = command.word.as_str(), "ignoring unknown command");
                Ok(())
            }
        }
    }

    async fn reply_status(&self, name: &str, reply_to: &Destination) -> RelayResult<()> {
        let Some(status) = self.store.read(name).await? else {
            debug!(server = name, "status requested for unknown server");
            return Ok(());
        };

        self.reply(status_message(&status, reply_to.clone())).await
    }

    async fn reply_subscribed_statuses(&self, reply_to: &Destination) -> RelayResult<()> {
        let statuses = self.store.list_subscribed(reply_to).await?;

        if statuses.is_empty() {
            return self
                .reply(OutboundMessage::plain(
                    reply_to.clone(),
                    format::usage_error(NO_SERVER_SPECIFIED),
                ))
                .await;
        }

        for status in &statuses {
            self.reply(status_message(status, reply_to.clone())).await?;
        }

        Ok(())
    }

    async fn subscribe(&self, name: &str, reply_to: &Destination) -> RelayResult<()> {
        self.store.set_subscriber(name, reply_to).await?;
        info!(server = name, destination = %reply_to, "subscriber updated");

        self.reply(OutboundMessage::plain(
            reply_to.clone(),
            format::subscribed(name),
        ))
        .await
    }

    async fn reply(&self, message: OutboundMessage) -> RelayResult<()> {
        self.messenger.send(message).await
    }
}

fn status_message(status: &ServerStatus, destination: Destination) -> OutboundMessage {
    let text = match (status.is_open, status.lock_holder.as_deref()) {
        (true, Some(holder)) => format::status_open(&status.name, holder),
        (true, None) => format::status_open(&status.name, ""),
        (false, _) => format::status_closed(&status.name),
    };

    OutboundMessage::markdown(destination, text)
}
