use tokio::sync::mpsc;

use crate::error::RelayResult;
use crate::messaging::{CommandSource, InboundCommand};
use crate::types::Destination;

/// Command source fed from a channel.
#[derive(Debug)]
pub struct ScriptedCommands {
    rx: mpsc::UnboundedReceiver<InboundCommand>,
}

impl ScriptedCommands {
    /// Source yielding `commands` in order, then ending.
    pub fn new<I>(commands: I) -> Self
    where
        I: IntoIterator<Item = InboundCommand>,
    {
        let (tx, source) = Self::channel();
        for command in commands {
            let _ = tx.send(command);
        }

        source
    }

    /// Source yielding whatever is sent on the returned sender, ending once it is dropped.
    pub fn channel() -> (mpsc::UnboundedSender<InboundCommand>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();

        (tx, Self { rx })
    }
}

impl CommandSource for ScriptedCommands {
    async fn next_command(&mut self) -> RelayResult<Option<InboundCommand>> {
        Ok(self.rx.recv().await)
    }
}

/// Builds a command from `tester` with replies going to `reply_to`.
pub fn command(word: &str, argument: &str, reply_to: &str) -> InboundCommand {
    InboundCommand {
        word: word.to_string(),
        argument: argument.to_string(),
        actor: "tester".to_string(),
        reply_to: Destination::new(reply_to),
    }
}
