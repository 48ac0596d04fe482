use serde::Deserialize;

use crate::error::{ErrorKind, RelayResult};
use crate::{bail, relay_error};

/// The subset of a GitHub push event the relay reads.
///
/// Unknown fields are ignored, so full webhook payloads deserialize as-is.
#[derive(Debug, Clone, Deserialize)]
pub struct PushEvent {
    pub commits: Vec<Commit>,
    pub repository: Repository,
    pub pusher: Pusher,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Commit {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub full_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Pusher {
    pub name: String,
}

impl PushEvent {
    /// Parses a raw push event payload.
    ///
    /// Any shape error, including an empty commit list, is reported as
    /// [`ErrorKind::MalformedEvent`].
    pub fn parse(payload: &[u8]) -> RelayResult<Self> {
        let event: PushEvent = serde_json::from_slice(payload).map_err(|err| {
            relay_error!(
                ErrorKind::MalformedEvent,
                "Push event is malformed",
                err,
                source: err
            )
        })?;

        if event.commits.is_empty() {
            bail!(
                ErrorKind::MalformedEvent,
                "Push event is malformed",
                "commit list is empty"
            );
        }

        Ok(event)
    }

    /// Message of the last commit in the push.
    pub fn last_message(&self) -> &str {
        self.commits
            .last()
            .map(|commit| commit.message.as_str())
            .unwrap_or_default()
    }

    pub fn server_name(&self) -> &str {
        &self.repository.full_name
    }

    pub fn actor(&self) -> &str {
        &self.pusher.name
    }
}
