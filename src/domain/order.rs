use super::Price;
use crate::filter::Tagged;
use crate::lifecycle::OrderStatus;

/// How the customer chose to pay for a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentMethod {
    #[default]
    Online,
    CashOnDelivery,
    Upi,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Online => "online",
            PaymentMethod::CashOnDelivery => "cod",
            PaymentMethod::Upi => "upi",
        }
    }
}

/// Represents a booked wash.
///
/// Descriptive fields are fixed at creation. Only the order service changes
/// the lifecycle fields below them.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: String,
    pub customer: String,
    pub service: String,
    pub price: Price,
    pub platform_fee: Price,
    pub date: String,
    pub time: String,
    pub address: String,
    pub bike_number: String,
    pub special_instructions: Option<String>,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub cancelled: bool,
    /// Washer who accepted the order.
    pub washer: Option<String>,
    /// Washers who turned the order down while it was open.
    pub declined_by: Vec<String>,
    /// Customer rating from 1 to 5, given once the wash is completed.
    pub rating: Option<u8>,
    pub review: Option<String>,
}

/// Payload for creating a new order.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub customer: String,
    pub service: String,
    pub price: Price,
    pub platform_fee: Price,
    pub date: String,
    pub time: String,
    pub address: String,
    pub bike_number: String,
    pub special_instructions: Option<String>,
    pub payment_method: PaymentMethod,
}

impl Order {
    /// Amount charged to the customer.
    pub fn total(&self) -> Price {
        self.price.saturating_add(self.platform_fee)
    }

    /// Washer payout once the platform fee is taken out.
    pub fn washer_earnings(&self) -> Price {
        self.price.saturating_sub(self.platform_fee)
    }

    /// Open for washers to accept: confirmed, not cancelled, nobody assigned.
    pub fn is_open(&self) -> bool {
        !self.cancelled && self.washer.is_none() && self.status == OrderStatus::Confirmed
    }

    /// Tag used by the customer's order history.
    pub fn history_tag(&self) -> &'static str {
        if self.cancelled {
            "cancelled"
        } else if self.status.is_terminal() {
            "completed"
        } else {
            "active"
        }
    }

    /// Tag used by the washer's order queue, projected from `status`.
    pub fn queue_tag(&self) -> &'static str {
        if self.cancelled {
            return "cancelled";
        }
        match self.status {
            OrderStatus::Confirmed | OrderStatus::Assigned => "assigned",
            OrderStatus::Arriving | OrderStatus::Working => "in_progress",
            OrderStatus::Completed => "completed",
        }
    }
}

impl Tagged for Order {
    fn tag(&self, field: &str) -> Option<&str> {
        match field {
            "status" => Some(self.status.as_str()),
            "history" => Some(self.history_tag()),
            "queue" => Some(self.queue_tag()),
            "service" => Some(self.service.as_str()),
            "washer" => self.washer.as_deref(),
            _ => None,
        }
    }
}

/// Washer payout summed over `orders`, usually the completed queue.
pub fn total_washer_earnings<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Price {
    orders
        .into_iter()
        .fold(0, |total: Price, order| total.saturating_add(order.washer_earnings()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(status: OrderStatus) -> Order {
        Order {
            id: "order_1".to_string(),
            customer: "Rahul Kumar".to_string(),
            service: "Premium Wash".to_string(),
            price: 250,
            platform_fee: 25,
            date: "2024-01-15".to_string(),
            time: "10:00 AM".to_string(),
            address: "123, MG Road, Bangalore".to_string(),
            bike_number: "KA-01-AB-1234".to_string(),
            special_instructions: None,
            payment_method: PaymentMethod::Online,
            status,
            cancelled: false,
            washer: None,
            declined_by: Vec::new(),
            rating: None,
            review: None,
        }
    }

    #[test]
    fn test_totals() {
        let order = order(OrderStatus::Confirmed);
        assert_eq!(order.total(), 275);
        assert_eq!(order.washer_earnings(), 225);
    }

    #[test]
    fn test_views_project_the_same_status() {
        let mut o = order(OrderStatus::Assigned);
        assert_eq!(o.queue_tag(), "assigned");
        assert_eq!(o.history_tag(), "active");

        o.status = OrderStatus::Working;
        assert_eq!(o.queue_tag(), "in_progress");

        o.status = OrderStatus::Completed;
        assert_eq!(o.queue_tag(), "completed");
        assert_eq!(o.history_tag(), "completed");

        let mut c = order(OrderStatus::Confirmed);
        c.cancelled = true;
        assert_eq!(c.history_tag(), "cancelled");
        assert_eq!(c.tag("status"), Some("confirmed"));
    }

    #[test]
    fn test_washer_tag_and_earnings_total() {
        let mut first = order(OrderStatus::Completed);
        first.washer = Some("Rajesh Kumar".to_string());
        let mut second = order(OrderStatus::Completed);
        second.price = 400;
        second.platform_fee = 40;
        let unassigned = order(OrderStatus::Confirmed);

        assert_eq!(first.tag("washer"), Some("Rajesh Kumar"));
        assert_eq!(unassigned.tag("washer"), None);
        assert!(unassigned.is_open());
        assert!(!first.is_open());

        // 225 + 360
        assert_eq!(total_washer_earnings([&first, &second]), 585);
        assert_eq!(total_washer_earnings(Vec::<&Order>::new()), 0);
    }

    #[test]
    fn test_total_saturates() {
        let mut o = order(OrderStatus::Confirmed);
        o.price = Price::MAX;
        assert_eq!(o.total(), Price::MAX);
    }
}
