//! Unbuffered single-consumer handoff.
//!
//! tokio has no zero-capacity channel, so each item travels with a oneshot acknowledgement that
//! the receiver fires as soon as it takes the item. [`HandoffTx::send`] waits for that
//! acknowledgement, which gives rendezvous semantics on top of a bounded mpsc channel.

use tokio::sync::{mpsc, oneshot};

use crate::bail;
use crate::error::{ErrorKind, RelayResult};

struct Envelope<T> {
    item: T,
    taken: oneshot::Sender<()>,
}

/// Sending half of a handoff. Cheap to clone.
pub struct HandoffTx<T> {
    tx: mpsc::Sender<Envelope<T>>,
}

impl<T> Clone for HandoffTx<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> std::fmt::Debug for HandoffTx<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandoffTx")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

/// Receiving half of a handoff. There is exactly one per handoff.
pub struct HandoffRx<T> {
    rx: mpsc::Receiver<Envelope<T>>,
}

impl<T> std::fmt::Debug for HandoffRx<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandoffRx").finish_non_exhaustive()
    }
}

/// Creates a new handoff.
pub fn create_handoff<T>() -> (HandoffTx<T>, HandoffRx<T>) {
    let (tx, rx) = mpsc::channel(1);

    (HandoffTx { tx }, HandoffRx { rx })
}

impl<T> HandoffTx<T> {
    /// Hands `item` to the receiver and waits until it has been taken.
    ///
    /// Fails with [`ErrorKind::DispatcherUnavailable`] if the receiver is dropped before taking
    /// the item.
    pub async fn send(&self, item: T) -> RelayResult<()> {
        let (taken_tx, taken_rx) = oneshot::channel();
        let envelope = Envelope {
            item,
            taken: taken_tx,
        };

        if self.tx.send(envelope).await.is_err() {
            bail!(
                ErrorKind::DispatcherUnavailable,
                "Notification receiver is gone"
            );
        }

        if taken_rx.await.is_err() {
            bail!(
                ErrorKind::DispatcherUnavailable,
                "Notification receiver stopped before taking the notification"
            );
        }

        Ok(())
    }
}

impl<T> HandoffRx<T> {
    /// Takes the next item, releasing its sender.
    ///
    /// Returns `None` once every [`HandoffTx`] has been dropped.
    pub async fn recv(&mut self) -> Option<T> {
        let Envelope { item, taken } = self.rx.recv().await?;
        // The sender may have been cancelled while waiting, the item is still ours.
        let _ = taken.send(());

        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn send_waits_until_the_item_is_taken() {
        let (tx, mut rx) = create_handoff::<u32>();

        let sender = tokio::spawn(async move { tx.send(7).await });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!sender.is_finished());

        assert_eq!(rx.recv().await, Some(7));
        sender.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn items_arrive_in_send_order_from_one_sender() {
        let (tx, mut rx) = create_handoff::<u32>();

        let sender = tokio::spawn(async move {
            for i in 0..3 {
                tx.send(i).await.unwrap();
            }
        });

        assert_eq!(rx.recv().await, Some(0));
        assert_eq!(rx.recv().await, Some(1));
        assert_eq!(rx.recv().await, Some(2));
        assert_eq!(rx.recv().await, None);
        sender.await.unwrap();
    }

    #[tokio::test]
    async fn send_fails_once_receiver_is_dropped() {
        let (tx, rx) = create_handoff::<u32>();
        drop(rx);

        let err = tx.send(1).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DispatcherUnavailable);
    }
}
