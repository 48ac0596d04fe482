use std::sync::Arc;

use tokio::sync::{Mutex, Notify};

use crate::bail;
use crate::error::{ErrorKind, RelayResult};
use crate::messaging::{Messenger, OutboundMessage};

#[derive(Debug, Default)]
struct Inner {
    sent: Vec<OutboundMessage>,
    failures_left: usize,
}

/// Messenger that records every delivered message and can be told to fail.
#[derive(Debug, Clone, Default)]
pub struct RecordingMessenger {
    inner: Arc<Mutex<Inner>>,
    delivered: Arc<Notify>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `count` sends fail with [`ErrorKind::DeliveryFailed`].
    pub async fn fail_next_sends(&self, count: usize) {
        self.inner.lock().await.failures_left = count;
    }

    /// Messages delivered so far, in delivery order.
    pub async fn sent(&self) -> Vec<OutboundMessage> {
        self.inner.lock().await.sent.clone()
    }

    /// Waits until at least `count` messages have been delivered and returns them.
    pub async fn wait_for_sent(&self, count: usize) -> Vec<OutboundMessage> {
        loop {
            let notified = self.delivered.notified();
            {
                let inner = self.inner.lock().await;
                if inner.sent.len() >= count {
                    return inner.sent.clone();
                }
            }
            notified.await;
        }
    }
}

impl Messenger for RecordingMessenger {
    async fn send(&self, message: OutboundMessage) -> RelayResult<()> {
        let mut inner = self.inner.lock().await;

        if inner.failures_left > 0 {
            inner.failures_left -= 1;
            bail!(
                ErrorKind::DeliveryFailed,
                "Message delivery failed",
                format!("injected failure for {}", message.destination)
            );
        }

        inner.sent.push(message);
        drop(inner);
        self.delivered.notify_waiters();

        Ok(())
    }
}
