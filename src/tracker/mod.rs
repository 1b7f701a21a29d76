//! Self-advancing order tracker.
//!
//! Stands in for a server push channel: a spawned task asks the order
//! service to advance the order once per interval until it is completed.
//! Views re-render from the order service's status feed, which also carries
//! changes made outside the tracker. Stopping or dropping the
//! [`TrackerHandle`] discards the pending advance.

use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn, Instrument};
use crate::clients::OrderClient;
use crate::lifecycle::OrderStatus;
use crate::order_actor::OrderError;

/// Stages advance this often unless configured otherwise.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Why a tracker task ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerExit {
    /// The order reached `completed`.
    Completed,
    /// The handle asked the tracker to stop.
    Stopped,
    /// The order was cancelled while being tracked.
    Cancelled,
    Failed(OrderError),
}

pub struct TrackerHandle {
    order_id: String,
    status: watch::Receiver<OrderStatus>,
    stop: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<TrackerExit>>,
}

impl TrackerHandle {
    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    /// Last stage published for the order.
    pub fn status(&self) -> OrderStatus {
        *self.status.borrow()
    }

    /// True once the task has ended, whatever the reason.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// A receiver that observes every advance, whoever made it.
    pub fn subscribe(&self) -> watch::Receiver<OrderStatus> {
        self.status.clone()
    }

    /// Stops scheduling advances and waits for the task to end.
    ///
    /// Returns `Completed` or `Cancelled` if the task had already finished
    /// for that reason.
    pub async fn stop(mut self) -> TrackerExit {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        self.join().await
    }

    /// Waits for the tracker to finish on its own.
    pub async fn wait(mut self) -> TrackerExit {
        self.join().await
    }

    async fn join(&mut self) -> TrackerExit {
        match self.task.take() {
            Some(task) => task.await.unwrap_or_else(|e| {
                TrackerExit::Failed(OrderError::ActorCommunicationError(e.to_string()))
            }),
            None => TrackerExit::Stopped,
        }
    }
}

impl Drop for TrackerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            debug!(order_id = %self.order_id, "Tracker dropped, aborting");
            task.abort();
        }
    }
}

/// Starts tracking `order_id` from its current stage.
///
/// # Errors
/// Fails if the order does not exist or is already cancelled.
#[instrument(skip(client))]
pub async fn track(client: OrderClient, order_id: String, interval: Duration) -> Result<TrackerHandle, OrderError> {
    let status_rx = client.watch_status(order_id.clone()).await?;
    let status = *status_rx.borrow();

    let (stop_tx, stop_rx) = oneshot::channel();
    let span = tracing::info_span!("order_tracker", order_id = %order_id);
    let task = tokio::spawn(run(client, order_id.clone(), status, interval, stop_rx).instrument(span));
    info!(status = %status, "Tracking started");

    Ok(TrackerHandle {
        order_id,
        status: status_rx,
        stop: Some(stop_tx),
        task: Some(task),
    })
}

async fn run(
    client: OrderClient,
    order_id: String,
    mut status: OrderStatus,
    interval: Duration,
    mut stop_rx: oneshot::Receiver<()>,
) -> TrackerExit {
    loop {
        if status.is_terminal() {
            info!("Order completed, tracker finished");
            return TrackerExit::Completed;
        }

        tokio::select! {
            biased;
            _ = &mut stop_rx => {
                info!(status = %status, "Tracker stopped");
                return TrackerExit::Stopped;
            }
            _ = tokio::time::sleep(interval) => {}
        }

        match client.advance_order(order_id.clone()).await {
            Ok(next) => status = next,
            Err(OrderError::Cancelled(_)) => {
                info!("Order cancelled, tracker finished");
                return TrackerExit::Cancelled;
            }
            Err(e) => {
                warn!(error = %e, "Advance failed, tracker finished");
                return TrackerExit::Failed(e);
            }
        }
    }
}
