use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};
use crate::actor_framework::ResourceClient;
use crate::booking::BookingRequest;
use crate::domain::{total_washer_earnings, Order, Price};
use crate::filter::filter_by_tag;
use crate::lifecycle::{status_steps, OrderStatus, StatusStep};
use crate::order_actor::{OrderAction, OrderActionResult, OrderError};

/// Live status channels, one per watched order.
///
/// Shared by every clone of an [`OrderClient`], so a change made through any
/// of them reaches every subscriber.
#[derive(Default)]
struct StatusFeeds {
    senders: Mutex<HashMap<String, watch::Sender<OrderStatus>>>,
}

impl StatusFeeds {
    fn subscribe(&self, id: &str, current: OrderStatus) -> watch::Receiver<OrderStatus> {
        let mut senders = self.senders.lock().unwrap_or_else(PoisonError::into_inner);
        let sender = senders
            .entry(id.to_string())
            .or_insert_with(|| watch::channel(current).0);
        Self::raise(sender, current);
        sender.subscribe()
    }

    /// Publishes `status` to subscribers of `id`. Stages only move forward.
    ///
    /// A terminal stage closes the feed once it has been published.
    fn publish(&self, id: &str, status: OrderStatus) {
        let mut senders = self.senders.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(sender) = senders.get(id) {
            Self::raise(sender, status);
            if status.is_terminal() {
                senders.remove(id);
            }
        }
    }

    /// Ends the feed for `id` without a further stage.
    fn close(&self, id: &str) {
        let mut senders = self.senders.lock().unwrap_or_else(PoisonError::into_inner);
        senders.remove(id);
    }

    fn raise(sender: &watch::Sender<OrderStatus>, status: OrderStatus) {
        sender.send_if_modified(|current| {
            if status > *current {
                *current = status;
                true
            } else {
                false
            }
        });
    }
}

/// Client for interacting with the Order actor.
///
/// The order actor is the single owner of every order's status. Customer
/// tracking, order history and the washer queue all read through here, and
/// every status change made here is published to [`OrderClient::watch_status`]
/// subscribers.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    feeds: Arc<StatusFeeds>,
}

crate::impl_client_methods!(OrderClient, Order, OrderError, order);

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self {
            inner,
            feeds: Arc::new(StatusFeeds::default()),
        }
    }

    /// Validates a booking form and records the order as `confirmed`.
    #[instrument(skip(self, request), fields(customer = %request.customer))]
    pub async fn book(&self, request: BookingRequest) -> Result<String, OrderError> {
        let params = request.into_order().map_err(|e| {
            warn!(error = %e, "Booking rejected");
            OrderError::from(e)
        })?;
        debug!("Sending request");
        let id = self.inner.create(params).await?;
        info!(order_id = %id, "Order booked");
        Ok(id)
    }

    #[instrument(skip(self))]
    pub async fn check_status(&self, id: String) -> Result<(OrderStatus, bool), OrderError> {
        match self.act(id, OrderAction::CheckStatus).await? {
            OrderActionResult::CheckStatus { status, cancelled } => Ok((status, cancelled)),
            _ => Err(OrderError::ActorCommunicationError("Unexpected result".to_string())),
        }
    }

    /// A receiver that sees every stage the order reaches from now on.
    ///
    /// The channel closes after `completed` is published or when the order
    /// is cancelled.
    ///
    /// # Errors
    /// Fails if the order does not exist or is already cancelled.
    #[instrument(skip(self))]
    pub async fn watch_status(&self, id: String) -> Result<watch::Receiver<OrderStatus>, OrderError> {
        let (status, cancelled) = self.check_status(id.clone()).await?;
        if cancelled {
            return Err(OrderError::Cancelled(id));
        }
        if status.is_terminal() {
            return Ok(watch::channel(status).1);
        }
        let receiver = self.feeds.subscribe(&id, status);
        // A change landing between the read and the subscribe is caught here.
        let (latest, _) = self.check_status(id.clone()).await?;
        self.feeds.publish(&id, latest);
        Ok(receiver)
    }

    /// Moves the order one stage forward and returns the stage it is now at.
    #[instrument(skip(self))]
    pub async fn advance_order(&self, id: String) -> Result<OrderStatus, OrderError> {
        match self.act(id.clone(), OrderAction::Advance).await? {
            OrderActionResult::Advance { from, to } => {
                if from != to {
                    info!(from = %from, to = %to, "Order advanced");
                }
                self.feeds.publish(&id, to);
                Ok(to)
            }
            _ => Err(OrderError::ActorCommunicationError("Unexpected result".to_string())),
        }
    }

    #[instrument(skip(self))]
    pub async fn cancel_order(&self, id: String) -> Result<(), OrderError> {
        match self.act(id.clone(), OrderAction::Cancel).await? {
            OrderActionResult::Cancel => {
                info!("Order cancelled");
                self.feeds.close(&id);
                Ok(())
            }
            _ => Err(OrderError::ActorCommunicationError("Unexpected result".to_string())),
        }
    }

    /// `washer` takes the open order; it moves to `assigned`.
    #[instrument(skip(self))]
    pub async fn accept_order(&self, id: String, washer: String) -> Result<OrderStatus, OrderError> {
        match self.act(id.clone(), OrderAction::Accept { washer }).await? {
            OrderActionResult::Accept { status } => {
                info!(status = %status, "Order accepted");
                self.feeds.publish(&id, status);
                Ok(status)
            }
            _ => Err(OrderError::ActorCommunicationError("Unexpected result".to_string())),
        }
    }

    #[instrument(skip(self))]
    pub async fn decline_order(&self, id: String, washer: String) -> Result<(), OrderError> {
        match self.act(id, OrderAction::Decline { washer }).await? {
            OrderActionResult::Decline => {
                info!("Order declined");
                Ok(())
            }
            _ => Err(OrderError::ActorCommunicationError("Unexpected result".to_string())),
        }
    }

    /// Records the customer's rating and optional review of a completed wash.
    #[instrument(skip(self, review))]
    pub async fn rate_order(&self, id: String, rating: u8, review: Option<String>) -> Result<(), OrderError> {
        match self.act(id, OrderAction::Rate { rating, review }).await? {
            OrderActionResult::Rate => {
                info!(rating, "Order rated");
                Ok(())
            }
            _ => Err(OrderError::ActorCommunicationError("Unexpected result".to_string())),
        }
    }

    /// Timeline for the tracking view.
    #[instrument(skip(self))]
    pub async fn tracking_timeline(&self, id: String) -> Result<[StatusStep; 5], OrderError> {
        let (status, _) = self.check_status(id).await?;
        Ok(status_steps(status))
    }

    /// Customer history under `selected`: `all`, `active`, `completed` or `cancelled`.
    #[instrument(skip(self))]
    pub async fn history(&self, selected: &str) -> Result<Vec<Order>, OrderError> {
        self.filtered("history", selected).await
    }

    /// Washer queue under `selected`: `all`, `assigned`, `in_progress` or `completed`.
    #[instrument(skip(self))]
    pub async fn washer_queue(&self, selected: &str) -> Result<Vec<Order>, OrderError> {
        self.filtered("queue", selected).await
    }

    /// Open orders `washer` has not turned down, oldest first.
    #[instrument(skip(self))]
    pub async fn open_orders(&self, washer: &str) -> Result<Vec<Order>, OrderError> {
        let orders = self.list_orders().await?;
        Ok(orders
            .into_iter()
            .filter(|order| order.is_open() && !order.declined_by.iter().any(|name| name == washer))
            .collect())
    }

    /// Washer payout summed over the completed queue, for one washer or for everyone.
    #[instrument(skip(self))]
    pub async fn total_earnings(&self, washer: Option<&str>) -> Result<Price, OrderError> {
        let completed = self.washer_queue("completed").await?;
        let total = match washer {
            Some(name) => total_washer_earnings(filter_by_tag(&completed, "washer", name)),
            None => total_washer_earnings(&completed),
        };
        debug!(total, "Earnings summed");
        Ok(total)
    }

    async fn filtered(&self, tag_field: &str, selected: &str) -> Result<Vec<Order>, OrderError> {
        let orders = self.list_orders().await?;
        let matching = filter_by_tag(&orders, tag_field, selected).into_iter().cloned().collect::<Vec<_>>();
        debug!(total = orders.len(), matching = matching.len(), "Orders filtered");
        Ok(matching)
    }

    async fn act(&self, id: String, action: OrderAction) -> Result<OrderActionResult, OrderError> {
        debug!("Sending request");
        let name = action.name();
        let result = self.inner.perform_action(id, action).await?;
        if let Err(e) = &result {
            warn!(error = %e, action = name, "Order action refused");
        }
        result
    }
}
