use std::sync::Arc;

use lockrelay::commands::CommandHandler;
use lockrelay::concurrency::handoff::create_handoff;
use lockrelay::dispatcher::NotificationDispatcher;
use lockrelay::error::Component;
use lockrelay::ingestion::{EventIngestor, ExactMessageClassifier};
use lockrelay::messaging::InboundCommand;
use lockrelay::store::memory::MemoryStore;
use lockrelay::supervisor::Supervisor;
use lockrelay::test_utils::{RecordingMessenger, ScriptedCommands, seeded_memory_store};
use lockrelay_config::shared::DeliveryFailurePolicy;
use tokio::sync::mpsc;

/// A fully wired relay running under a supervisor, with in-memory doubles at its edges.
pub struct TestRelay {
    pub store: MemoryStore,
    pub messenger: RecordingMessenger,
    pub ingestor: EventIngestor<MemoryStore>,
    pub commands: mpsc::UnboundedSender<InboundCommand>,
    pub supervisor: Supervisor,
}

pub fn spawn_relay(servers: &[&str], policy: DeliveryFailurePolicy) -> TestRelay {
    let store = seeded_memory_store(servers);
    let messenger = RecordingMessenger::new();
    let (notifications_tx, notifications_rx) = create_handoff();

    let ingestor = EventIngestor::new(
        store.clone(),
        Arc::new(ExactMessageClassifier::default()),
        notifications_tx,
    );
    let dispatcher =
        NotificationDispatcher::new(store.clone(), messenger.clone(), notifications_rx, policy);
    let handler = CommandHandler::new(store.clone(), messenger.clone());
    let (commands, source) = ScriptedCommands::channel();

    let mut supervisor = Supervisor::new();
    supervisor.spawn(Component::Dispatcher, dispatcher.run());
    supervisor.spawn(Component::CommandHandler, handler.run(source));

    TestRelay {
        store,
        messenger,
        ingestor,
        commands,
        supervisor,
    }
}
