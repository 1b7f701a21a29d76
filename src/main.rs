use bikewash::app_system::{setup_tracing, MarketplaceSystem, SystemConfig, SystemError};
use bikewash::booking::{find_service, BookingRequest, Quote};
use bikewash::cart::Cart;
use bikewash::domain::{Category, PaymentMethod};
use bikewash::filter::ALL;
use bikewash::lifecycle::status_steps;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), SystemError> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = SystemConfig::from_env();
    info!(interval_ms = config.tracker_interval.as_millis() as u64, "Starting marketplace");

    let mut system = MarketplaceSystem::start(config).await?;

    // Customer fills a cart from the store
    let span = tracing::info_span!("store");
    let cart = async {
        let mut cart = Cart::new();
        for product in system.product_client.browse(Some(Category::Wash), "").await? {
            system.product_client.add_to_cart(&mut cart, product.id).await?;
        }
        let lubricant = system.product_client.browse(None, "chain").await?;
        if let Some(product) = lubricant.into_iter().next() {
            system.product_client.add_to_cart(&mut cart, product.id.clone()).await?;
            system.product_client.add_to_cart(&mut cart, product.id).await?;
        }
        Ok::<_, SystemError>(cart)
    }
    .instrument(span)
    .await?;
    info!(items = cart.total_item_count(), total = cart.total_price(), "Cart ready");

    // Customer books a wash
    let request = BookingRequest {
        customer: "Rahul Kumar".to_string(),
        service: find_service("Premium Wash"),
        date: "2024-01-15".to_string(),
        time_slot: Some("10:00 AM".to_string()),
        address: "123, MG Road, Bangalore".to_string(),
        bike_number: "KA-01-AB-1234".to_string(),
        special_instructions: Some("Please pay extra attention to the chain area".to_string()),
        payment_method: PaymentMethod::Upi,
    };
    if let Ok(Quote { price, platform_fee, total }) = request.quote() {
        info!(price, platform_fee, total, "Booking quote");
    }

    let span = tracing::info_span!("booking");
    let order_id = async { system.order_client.book(request).await }
        .instrument(span)
        .await?;

    // A washer picks the order up
    let washer = "Rajesh Kumar".to_string();
    let offered = system.order_client.open_orders(&washer).await?;
    info!(washer = %washer, offered = offered.len(), "Open orders");
    system.order_client.accept_order(order_id.clone(), washer.clone()).await?;

    // Track the order until the washer finishes
    let mut status = system.track_order(order_id.clone()).await?;
    loop {
        let current = *status.borrow_and_update();
        let reached = status_steps(current).iter().filter(|step| step.completed).count();
        info!(order_id = %order_id, status = %current, reached, "Tracking update");
        if current.is_terminal() || status.changed().await.is_err() {
            break;
        }
    }

    system
        .order_client
        .rate_order(order_id.clone(), 5, Some("Excellent service! My bike looks brand new.".to_string()))
        .await?;
    let earned = system.order_client.total_earnings(Some(washer.as_str())).await?;
    info!(washer = %washer, earned, "Washer earnings");

    match system.order_client.history(ALL).await {
        Ok(orders) => {
            for order in orders {
                info!(
                    order_id = %order.id,
                    history = order.history_tag(),
                    queue = order.queue_tag(),
                    earnings = order.washer_earnings(),
                    rating = ?order.rating,
                    "Order summary"
                );
            }
        }
        Err(e) => error!(error = %e, "Could not load order history"),
    }

    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
