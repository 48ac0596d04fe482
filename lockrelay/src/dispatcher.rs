//! Notification Dispatcher: delivers lock changes to the subscriber of each server.

use lockrelay_config::shared::DeliveryFailurePolicy;
use metrics::counter;
use tracing::{debug, info, warn};

use crate::concurrency::handoff::HandoffRx;
use crate::error::RelayResult;
use crate::messaging::{Messenger, OutboundMessage, format};
use crate::metrics::{
    ERROR_KIND_LABEL, LOCKRELAY_DELIVERY_FAILURES_TOTAL, LOCKRELAY_NOTIFICATIONS_DISPATCHED_TOTAL,
    LOCKRELAY_NOTIFICATIONS_DROPPED_TOTAL, REASON_LABEL,
};
use crate::store::StatusStore;
use crate::types::Notification;

/// Single consumer of the notification handoff.
#[derive(Debug)]
pub struct NotificationDispatcher<S, M> {
    store: S,
    messenger: M,
    notifications: HandoffRx<Notification>,
    policy: DeliveryFailurePolicy,
}

impl<S, M> NotificationDispatcher<S, M>
where
    S: StatusStore,
    M: Messenger,
{
    pub fn new(
        store: S,
        messenger: M,
        notifications: HandoffRx<Notification>,
        policy: DeliveryFailurePolicy,
    ) -> Self {
        Self {
            store,
            messenger,
            notifications,
            policy,
        }
    }

    /// Dispatches notifications until every sender is gone.
    ///
    /// Returns the first store failure, and the first delivery failure when the policy is
    /// [`DeliveryFailurePolicy::Fatal`].
    pub async fn run(mut self) -> RelayResult<()> {
        info!(policy = ?self.policy, "starting notification dispatcher");

        while let Some(notification) = self.notifications.recv().await {
            self.dispatch(&notification).await?;
        }

        info!("notification handoff closed, stopping dispatcher");

        Ok(())
    }

    /// Delivers one notification to the current subscriber of its server, if any.
    pub async fn dispatch(&self, notification: &Notification) -> RelayResult<()> {
        let server = notification.server_name.as_str();

        let Some(status) = self.store.read(server).await? else {
            debug!(server, "dropping notification for unknown server");
            counter!(LOCKRELAY_NOTIFICATIONS_DROPPED_TOTAL, REASON_LABEL => "unknown_server")
                .increment(1);
            return Ok(());
        };

        let Some(destination) = status.subscriber else {
            debug!(server, "dropping notification, server has no subscriber");
            counter!(LOCKRELAY_NOTIFICATIONS_DROPPED_TOTAL, REASON_LABEL => "no_subscriber")
                .increment(1);
            return Ok(());
        };

        let text = if notification.is_open {
            format::lock_opened(server, &notification.actor)
        } else {
            format::lock_closed(server)
        };

        match self
            .messenger
            .send(OutboundMessage::markdown(destination.clone(), text))
            .await
        {
            Ok(()) => {
                debug!(server, %destination, "notification delivered");
                counter!(LOCKRELAY_NOTIFICATIONS_DISPATCHED_TOTAL).increment(1);
                Ok(())
            }
            Err(err) => {
                counter!(
                    LOCKRELAY_DELIVERY_FAILURES_TOTAL,
                    ERROR_KIND_LABEL => err.kind().as_static_str()
                )
                .increment(1);

                match self.policy {
                    DeliveryFailurePolicy::Fatal => Err(err),
                    DeliveryFailurePolicy::Log => {
                        warn!(
                            server,
                            %destination,
                            error = %err,
                            "notification delivery failed, dropping it"
                        );
                        Ok(())
                    }
                }
            }
        }
    }
}
