//! Supervisor: runs the host loops and turns the first exit into a [`FatalError`].
//!
//! Every loop is expected to run forever, so any exit counts as a failure, including a clean
//! `Ok(())` return. There is no restart logic. Once the first exit is reported, all other loops
//! are aborted and the caller is expected to stop the process.

use std::future::Future;

use metrics::counter;
use tokio::task::{AbortHandle, JoinSet};
use tracing::{debug, error};

use crate::concurrency::errors::{ErrorRx, ErrorTx, HostExit, create_error_channel};
use crate::error::{Component, ErrorKind, FatalError, RelayResult};
use crate::metrics::{COMPONENT_LABEL, ERROR_KIND_LABEL, LOCKRELAY_HOST_EXITS_TOTAL};
use crate::relay_error;

/// Buffered reports before a reporter has to wait. Further reports queue, none is dropped.
const HOST_EXIT_CHANNEL_CAPACITY: usize = 3;

#[derive(Debug)]
pub struct Supervisor {
    errors_tx: ErrorTx,
    errors_rx: ErrorRx,
    /// Host loop tasks, aborted once the first exit is observed.
    loops: Vec<(Component, AbortHandle)>,
    /// Tasks waiting on each host loop to report its exit.
    reporters: JoinSet<()>,
}

impl Supervisor {
    pub fn new() -> Self {
        let (errors_tx, errors_rx) = create_error_channel(HOST_EXIT_CHANNEL_CAPACITY);

        Self {
            errors_tx,
            errors_rx,
            loops: Vec::new(),
            reporters: JoinSet::new(),
        }
    }

    /// Runs `future` as the host loop of `component`.
    ///
    /// Exactly one [`HostExit`] is reported when the loop ends: its own error, or an error of
    /// kind [`ErrorKind::HostLoopPanic`] if it panicked. A loop aborted by the supervisor reports
    /// nothing.
    pub fn spawn<F>(&mut self, component: Component, future: F)
    where
        F: Future<Output = RelayResult<()>> + Send + 'static,
    {
        let host_loop = tokio::spawn(future);
        self.loops.push((component, host_loop.abort_handle()));

        let errors_tx = self.errors_tx.clone();
        self.reporters.spawn(async move {
            let result = match host_loop.await {
                Ok(result) => result,
                Err(err) if err.is_panic() => Err(relay_error!(
                    ErrorKind::HostLoopPanic,
                    "Host loop panicked",
                    component
                )),
                Err(_) => {
                    debug!(%component, "host loop cancelled");
                    return;
                }
            };

            errors_tx.report(component, result).await;
        });

        debug!(%component, "spawned host loop");
    }

    /// Waits for the first host loop exit, aborts every other loop and returns the exit as a
    /// fatal error.
    ///
    /// Waits forever when no loop has been spawned.
    pub async fn wait(&mut self) -> FatalError {
        let fatal = match self.errors_rx.recv().await {
            Some(exit) => fatal_from_exit(exit),
            // The supervisor holds a sender, so the channel never closes while waiting.
            None => FatalError::new(
                Component::EventIngestion,
                relay_error!(ErrorKind::Unknown, "Host exit channel closed unexpectedly"),
            ),
        };

        counter!(
            LOCKRELAY_HOST_EXITS_TOTAL,
            COMPONENT_LABEL => fatal.component.as_static_str(),
            ERROR_KIND_LABEL => fatal.kind().as_static_str()
        )
        .increment(1);
        error!(component = %fatal.component, error = %fatal.error, "host loop stopped");

        self.shutdown();

        fatal
    }

    /// Aborts every host loop without waiting for an exit.
    pub fn shutdown(&mut self) {
        for (component, handle) in self.loops.drain(..) {
            if !handle.is_finished() {
                debug!(%component, "aborting host loop");
                handle.abort();
            }
        }

        self.reporters.abort_all();
    }
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Supervisor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn fatal_from_exit(exit: HostExit) -> FatalError {
    let HostExit { component, result } = exit;

    let error = match result {
        Ok(()) => relay_error!(
            ErrorKind::HostLoopExited,
            "Host loop exited without an error",
            component
        ),
        Err(err) => err,
    };

    FatalError::new(component, error)
}
