//! In-memory doubles and fixtures for testing the relay without external services.

mod commands;
mod messenger;
mod store;

pub use commands::{ScriptedCommands, command};
pub use messenger::RecordingMessenger;
pub use store::{FailingStore, seeded_memory_store};

/// Builds a minimal push event payload whose commits carry `messages` in order.
pub fn push_event(server: &str, actor: &str, messages: &[&str]) -> Vec<u8> {
    let commits: Vec<_> = messages
        .iter()
        .map(|message| serde_json::json!({ "message": message }))
        .collect();

    serde_json::to_vec(&serde_json::json!({
        "commits": commits,
        "repository": { "full_name": server },
        "pusher": { "name": actor },
    }))
    .expect("push event serializes")
}
