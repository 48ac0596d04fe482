use std::sync::Arc;

use metrics::counter;
use tracing::{debug, info};

use crate::concurrency::handoff::HandoffTx;
use crate::error::RelayResult;
use crate::ingestion::classifier::TransitionClassifier;
use crate::ingestion::event::PushEvent;
use crate::metrics::{LOCKRELAY_EVENTS_INGESTED_TOTAL, TRANSITION_LABEL};
use crate::store::StatusStore;
use crate::types::Notification;

/// Applies push events to the store and hands the resulting notifications to the dispatcher.
///
/// The ingestor is cheap to clone and is shared by every request handled by the transport.
pub struct EventIngestor<S> {
    store: S,
    classifier: Arc<dyn TransitionClassifier>,
    notifications: HandoffTx<Notification>,
}

impl<S: Clone> Clone for EventIngestor<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            classifier: self.classifier.clone(),
            notifications: self.notifications.clone(),
        }
    }
}

impl<S> EventIngestor<S>
where
    S: StatusStore,
{
    pub fn new(
        store: S,
        classifier: Arc<dyn TransitionClassifier>,
        notifications: HandoffTx<Notification>,
    ) -> Self {
        Self {
            store,
            classifier,
            notifications,
        }
    }

    /// Processes one raw push event payload.
    ///
    /// The store write completes before the notification is handed off, and the call only
    /// returns once the dispatcher has taken the notification. Store failures are returned to
    /// the caller without a notification being sent.
    pub async fn ingest(&self, payload: &[u8]) -> RelayResult<Notification> {
        let event = PushEvent::parse(payload)?;
        let server = event.server_name();
        let actor = event.actor();
        let message = event.last_message();

        info!(server, actor, commit_message = message, "received push event");

        let transition = self.classifier.classify(message);
        self.store.set_lock(server, actor, transition).await?;

        counter!(
            LOCKRELAY_EVENTS_INGESTED_TOTAL,
            TRANSITION_LABEL => transition.as_static_str()
        )
        .increment(1);

        let notification = Notification {
            server_name: server.to_string(),
            actor: actor.to_string(),
            is_open: transition.is_open(),
        };
        self.notifications.send(notification.clone()).await?;

        debug!(server, transition = transition.as_static_str(), "notification handed off");

        Ok(notification)
    }
}
