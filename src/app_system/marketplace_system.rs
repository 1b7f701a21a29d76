use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, instrument};
use crate::actor_framework::ResourceActor;
use crate::clients::{OrderClient, ProductClient};
use crate::domain::{default_catalog, Order, Product};
use crate::lifecycle::OrderStatus;
use crate::order_actor::OrderError;
use crate::tracker::{self, TrackerExit, TrackerHandle};
use super::{SystemConfig, SystemError};

/// Sequential ids of the form `<prefix>_<n>`, starting at 1.
fn id_sequence(prefix: &'static str) -> impl Fn() -> String + Send + Sync + 'static {
    let counter = Arc::new(AtomicU64::new(1));
    move || format!("{}_{}", prefix, counter.fetch_add(1, Ordering::SeqCst))
}

/// The application system that owns every actor and order tracker.
///
/// Responsible for starting up actors, wiring them together, and handling shutdown.
pub struct MarketplaceSystem {
    pub order_client: OrderClient,
    pub product_client: ProductClient,
    config: SystemConfig,
    trackers: HashMap<String, TrackerHandle>,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl MarketplaceSystem {
    /// Starts the product and order services with an empty catalog.
    #[instrument(name = "marketplace_system")]
    pub fn new(config: SystemConfig) -> Self {
        let (product_actor, product_inner) =
            ResourceActor::<Product>::new(config.channel_buffer, id_sequence("product"));
        let product_handle = tokio::spawn(product_actor.run());

        let (order_actor, order_inner) =
            ResourceActor::<Order>::new(config.channel_buffer, id_sequence("order"));
        let order_handle = tokio::spawn(order_actor.run());

        info!("Marketplace system started");

        Self {
            order_client: OrderClient::new(order_inner),
            product_client: ProductClient::new(product_inner),
            config,
            trackers: HashMap::new(),
            handles: vec![product_handle, order_handle],
        }
    }

    /// Starts the system and loads the store's default catalog.
    pub async fn start(config: SystemConfig) -> Result<Self, SystemError> {
        let system = Self::new(config);
        system.seed_catalog().await?;
        Ok(system)
    }

    #[instrument(skip(self))]
    pub async fn seed_catalog(&self) -> Result<Vec<String>, SystemError> {
        let mut ids = Vec::new();
        for product in default_catalog() {
            ids.push(self.product_client.create_product(product).await?);
        }
        info!(count = ids.len(), "Catalog seeded");
        Ok(ids)
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    /// Starts the self-advancing tracker for `order_id`.
    ///
    /// An existing tracker for the same order is torn down first, so at most
    /// one timer ever advances a given order. Trackers whose task already
    /// ended are dropped on the way.
    #[instrument(skip(self))]
    pub async fn track_order(&mut self, order_id: String) -> Result<watch::Receiver<OrderStatus>, OrderError> {
        self.prune_finished_trackers();
        if let Some(previous) = self.trackers.remove(&order_id) {
            previous.stop().await;
        }
        let handle = tracker::track(self.order_client.clone(), order_id.clone(), self.config.tracker_interval).await?;
        let receiver = handle.subscribe();
        self.trackers.insert(order_id, handle);
        Ok(receiver)
    }

    /// Number of trackers still held, finished or not.
    pub fn tracker_count(&self) -> usize {
        self.trackers.len()
    }

    fn prune_finished_trackers(&mut self) {
        let before = self.trackers.len();
        self.trackers.retain(|_, handle| !handle.is_finished());
        let pruned = before - self.trackers.len();
        if pruned > 0 {
            debug!(pruned, "Finished trackers dropped");
        }
    }

    /// Tears down the tracker for `order_id`, if one is running.
    #[instrument(skip(self))]
    pub async fn stop_tracking(&mut self, order_id: &str) -> Option<TrackerExit> {
        let handle = self.trackers.remove(order_id)?;
        Some(handle.stop().await)
    }

    /// Gracefully shutdown the marketplace system
    ///
    /// Trackers go first since they hold order clients, then the clients are
    /// dropped so the actor loops end.
    #[instrument(skip(self))]
    pub async fn shutdown(mut self) -> Result<(), SystemError> {
        info!("Shutting down marketplace system");

        for (order_id, handle) in self.trackers.drain() {
            let exit = handle.stop().await;
            info!(order_id = %order_id, exit = ?exit, "Tracker stopped");
        }

        drop(self.order_client);
        drop(self.product_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Actor task failed");
                return Err(SystemError::ActorTaskFailed(e.to_string()));
            }
        }

        info!("Marketplace system shutdown complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::{find_service, BookingRequest};
    use crate::cart::Cart;
    use crate::domain::Category;
    use crate::filter::ALL;
    use crate::product_actor::ProductError;
    use std::time::Duration;

    fn booking(service: &str, slot: &str) -> BookingRequest {
        BookingRequest {
            customer: "Sneha Reddy".to_string(),
            service: find_service(service),
            date: "2024-01-14".to_string(),
            time_slot: Some(slot.to_string()),
            address: "321, JP Nagar, Bangalore".to_string(),
            bike_number: "KA-04-GH-3456".to_string(),
            ..BookingRequest::default()
        }
    }

    #[tokio::test]
    async fn test_seeded_catalog_and_cart() {
        let system = MarketplaceSystem::start(SystemConfig::default()).await.unwrap();

        let all = system.product_client.list_products().await.unwrap();
        assert_eq!(all.len(), 6);
        assert_eq!(all[0].id, "product_1");

        let accessories = system.product_client.browse(Some(Category::Accessories), "").await.unwrap();
        let names: Vec<&str> = accessories.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Bike Cover", "Microfiber Cloth Set"]);

        let mut cart = Cart::new();
        // Waterless Wash Solution (299) twice, Chain Lubricant (199) once
        system.product_client.add_to_cart(&mut cart, "product_1".to_string()).await.unwrap();
        let qty = system.product_client.add_to_cart(&mut cart, "product_1".to_string()).await.unwrap();
        system.product_client.add_to_cart(&mut cart, "product_2".to_string()).await.unwrap();
        assert_eq!(qty, 2);
        assert_eq!(cart.total_price(), 797);
        assert_eq!(cart.total_item_count(), 3);

        system.product_client.set_stock("product_5".to_string(), false).await.unwrap();
        let err = system.product_client.add_to_cart(&mut cart, "product_5".to_string()).await.unwrap_err();
        assert_eq!(err, ProductError::OutOfStock("product_5".to_string()));
        assert_eq!(cart.total_item_count(), 3);

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_history_and_queue_share_one_status() {
        let system = MarketplaceSystem::new(SystemConfig::default());
        let orders = &system.order_client;

        let first = orders.book(booking("Premium Wash", "10:00 AM")).await.unwrap();
        let second = orders.book(booking("Basic Wash", "11:00 AM")).await.unwrap();
        let third = orders.book(booking("Deluxe Package", "02:00 PM")).await.unwrap();

        for _ in 0..4 {
            orders.advance_order(first.clone()).await.unwrap();
        }
        orders.advance_order(second.clone()).await.unwrap();
        orders.advance_order(second.clone()).await.unwrap();
        orders.cancel_order(third.clone()).await.unwrap();

        let ids = |list: Vec<Order>| list.into_iter().map(|o| o.id).collect::<Vec<_>>();
        assert_eq!(ids(orders.history(ALL).await.unwrap()), vec![first.clone(), second.clone(), third.clone()]);
        assert_eq!(ids(orders.history("completed").await.unwrap()), vec![first.clone()]);
        assert_eq!(ids(orders.history("cancelled").await.unwrap()), vec![third.clone()]);
        assert_eq!(ids(orders.washer_queue("in_progress").await.unwrap()), vec![second.clone()]);
        assert_eq!(ids(orders.washer_queue("completed").await.unwrap()), vec![first]);

        let timeline = orders.tracking_timeline(second).await.unwrap();
        let reached: Vec<bool> = timeline.iter().map(|s| s.completed).collect();
        assert_eq!(reached, vec![true, true, true, false, false]);

        system.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_track_order_and_shutdown_stops_trackers() {
        let config = SystemConfig { tracker_interval: Duration::from_secs(1), ..SystemConfig::default() };
        let mut system = MarketplaceSystem::new(config);
        let id = system.order_client.book(booking("Basic Wash", "09:00 AM")).await.unwrap();

        let mut rx = system.track_order(id.clone()).await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), OrderStatus::Assigned);

        // Restarting replaces the running tracker instead of adding a second one.
        system.track_order(id.clone()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        let (status, _) = system.order_client.check_status(id.clone()).await.unwrap();
        assert_eq!(status, OrderStatus::Arriving);

        system.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_tracking_freezes_status() {
        let config = SystemConfig { tracker_interval: Duration::from_secs(1), ..SystemConfig::default() };
        let mut system = MarketplaceSystem::new(config);
        let id = system.order_client.book(booking("Basic Wash", "09:00 AM")).await.unwrap();

        let mut rx = system.track_order(id.clone()).await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), OrderStatus::Assigned);

        assert_eq!(system.stop_tracking(&id).await, Some(TrackerExit::Stopped));
        assert_eq!(system.stop_tracking(&id).await, None);
        assert_eq!(system.stop_tracking("order_404").await, None);
        assert_eq!(system.tracker_count(), 0);

        tokio::time::sleep(Duration::from_secs(10)).await;
        let (status, _) = system.order_client.check_status(id).await.unwrap();
        assert_eq!(status, OrderStatus::Assigned);

        system.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_finished_trackers_are_pruned() {
        let config = SystemConfig { tracker_interval: Duration::from_secs(1), ..SystemConfig::default() };
        let mut system = MarketplaceSystem::new(config);
        let first = system.order_client.book(booking("Basic Wash", "09:00 AM")).await.unwrap();
        let second = system.order_client.book(booking("Premium Wash", "10:00 AM")).await.unwrap();

        let mut rx = system.track_order(first.clone()).await.unwrap();
        while rx.changed().await.is_ok() {
            if rx.borrow_and_update().is_terminal() {
                break;
            }
        }
        // Let the finished tracker task wind down.
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(system.tracker_count(), 1);

        system.track_order(second).await.unwrap();
        assert_eq!(system.tracker_count(), 1);
        assert_eq!(system.stop_tracking(&first).await, None);

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_price_and_stock_through_the_catalog() {
        let system = MarketplaceSystem::start(SystemConfig::default()).await.unwrap();
        let products = &system.product_client;

        // Chain Lubricant: 199, originally 249
        let lube = products.update_price("product_2".to_string(), 299).await.unwrap();
        assert_eq!((lube.price, lube.original_price), (299, 299));
        assert_eq!(lube.discount_percent(), None);

        // Bike Cover: 399, originally 499
        let cover = products.update_price("product_4".to_string(), 349).await.unwrap();
        assert_eq!((cover.price, cover.original_price), (349, 499));
        assert_eq!(cover.discount_percent(), Some(30));

        let stored = products.get_product("product_2".to_string()).await.unwrap().unwrap();
        assert_eq!(stored.original_price, 299);

        assert!(products.check_stock("product_5".to_string()).await.unwrap());
        assert!(products.set_stock("product_5".to_string(), false).await.unwrap());
        assert!(!products.check_stock("product_5".to_string()).await.unwrap());
        assert!(!products.set_stock("product_5".to_string(), false).await.unwrap());

        let err = products.check_stock("product_404".to_string()).await.unwrap_err();
        assert_eq!(err, ProductError::NotFound("product_404".to_string()));
        let err = products.update_price("product_404".to_string(), 10).await.unwrap_err();
        assert_eq!(err, ProductError::NotFound("product_404".to_string()));

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_washers_accept_decline_rate_and_earn() {
        let system = MarketplaceSystem::new(SystemConfig::default());
        let orders = &system.order_client;
        let rajesh = "Rajesh Kumar".to_string();
        let amit = "Amit Patel".to_string();

        let first = orders.book(booking("Premium Wash", "10:00 AM")).await.unwrap();
        let second = orders.book(booking("Deluxe Package", "02:00 PM")).await.unwrap();
        let third = orders.book(booking("Basic Wash", "04:00 PM")).await.unwrap();

        orders.decline_order(third.clone(), rajesh.clone()).await.unwrap();
        let ids = |list: Vec<Order>| list.into_iter().map(|o| o.id).collect::<Vec<_>>();
        assert_eq!(ids(orders.open_orders(&rajesh).await.unwrap()), vec![first.clone(), second.clone()]);
        assert_eq!(ids(orders.open_orders(&amit).await.unwrap()).len(), 3);

        assert_eq!(orders.accept_order(first.clone(), rajesh.clone()).await, Ok(OrderStatus::Assigned));
        orders.accept_order(second.clone(), amit.clone()).await.unwrap();
        assert_eq!(
            orders.accept_order(first.clone(), amit.clone()).await,
            Err(OrderError::NotOpen(first.clone()))
        );

        for _ in 0..3 {
            orders.advance_order(first.clone()).await.unwrap();
            orders.advance_order(second.clone()).await.unwrap();
        }
        assert_eq!(orders.washer_queue("completed").await.unwrap().len(), 2);

        // Premium 250 - 25, Deluxe 400 - 40
        assert_eq!(orders.total_earnings(None).await.unwrap(), 585);
        assert_eq!(orders.total_earnings(Some(rajesh.as_str())).await.unwrap(), 225);
        assert_eq!(orders.total_earnings(Some("Priya Sharma")).await.unwrap(), 0);

        orders.rate_order(first.clone(), 5, Some("Excellent service!".to_string())).await.unwrap();
        assert_eq!(orders.rate_order(first.clone(), 4, None).await, Err(OrderError::AlreadyRated(first.clone())));
        assert_eq!(
            orders.rate_order(third.clone(), 4, None).await,
            Err(OrderError::NotRateable { id: third, status: OrderStatus::Confirmed })
        );

        let rated = orders.get_order(first).await.unwrap().unwrap();
        assert_eq!(rated.rating, Some(5));
        assert_eq!(rated.review.as_deref(), Some("Excellent service!"));
        assert_eq!(rated.washer.as_deref(), Some("Rajesh Kumar"));

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_booking_is_rejected() {
        let system = MarketplaceSystem::new(SystemConfig::default());
        let mut request = booking("Premium Wash", "10:00 AM");
        request.bike_number = "  ".to_string();
        let err = system.order_client.book(request).await.unwrap_err();
        assert_eq!(err, OrderError::InvalidBooking(crate::booking::BookingError::MissingBikeNumber));
        assert!(system.order_client.list_orders().await.unwrap().is_empty());
        system.shutdown().await.unwrap();
    }
}
