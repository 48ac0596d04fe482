//! Exit reports from supervised loops.

use tokio::sync::mpsc;
use tracing::debug;

use crate::error::{Component, RelayResult};

/// Final outcome of a supervised loop.
#[derive(Debug)]
pub struct HostExit {
    pub component: Component,
    pub result: RelayResult<()>,
}

/// Producer side of the exit report channel, one clone per supervised loop.
#[derive(Debug, Clone)]
pub struct ErrorTx {
    tx: mpsc::Sender<HostExit>,
}

/// Consumer side of the exit report channel, owned by the supervisor.
#[derive(Debug)]
pub struct ErrorRx {
    rx: mpsc::Receiver<HostExit>,
}

/// Creates an exit report channel with room for `capacity` buffered reports.
///
/// Reports beyond `capacity` wait for room, so none is lost while the consumer is alive.
pub fn create_error_channel(capacity: usize) -> (ErrorTx, ErrorRx) {
    let (tx, rx) = mpsc::channel(capacity.max(1));

    (ErrorTx { tx }, ErrorRx { rx })
}

impl ErrorTx {
    /// Reports the exit of `component`, waiting for buffer room if needed.
    ///
    /// Reports sent after the supervisor has gone are dropped.
    pub async fn report(&self, component: Component, result: RelayResult<()>) {
        if self.tx.send(HostExit { component, result }).await.is_err() {
            debug!(%component, "exit report dropped, supervisor is gone");
        }
    }
}

impl ErrorRx {
    /// Waits for the next report, or `None` when every producer is gone.
    pub async fn recv(&mut self) -> Option<HostExit> {
        self.rx.recv().await
    }
}
