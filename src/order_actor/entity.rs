use crate::actor_framework::{Entity, FrameworkError};
use crate::domain::{Order, OrderCreate};
use crate::lifecycle::{self, OrderStatus};
use super::actions::{OrderAction, OrderActionResult};
use super::error::OrderError;

impl Entity for Order {
    type Id = String;
    type CreateParams = OrderCreate;
    type Patch = ();
    type Action = OrderAction;
    type ActionResult = Result<OrderActionResult, OrderError>;

    /// Creates a new Order from creation parameters.
    ///
    /// # Notes
    /// The order starts at `confirmed`, the moment the booking is accepted.
    fn from_create_params(id: String, params: OrderCreate) -> Result<Self, FrameworkError> {
        Ok(Self {
            id,
            customer: params.customer,
            service: params.service,
            price: params.price,
            platform_fee: params.platform_fee,
            date: params.date,
            time: params.time,
            address: params.address,
            bike_number: params.bike_number,
            special_instructions: params.special_instructions,
            payment_method: params.payment_method,
            status: OrderStatus::Confirmed,
            cancelled: false,
            washer: None,
            declined_by: Vec::new(),
            rating: None,
            review: None,
        })
    }

    /// Descriptive fields are immutable; lifecycle fields only change through actions.
    fn on_update(&mut self, _patch: ()) -> Result<(), FrameworkError> {
        Err(FrameworkError::Rejected(format!("order {} only changes through actions", self.id)))
    }

    /// Orders are archived, never deleted.
    fn on_delete(&self) -> Result<(), FrameworkError> {
        Err(FrameworkError::Rejected(format!("order {} is kept in history", self.id)))
    }

    /// Handles order-specific actions.
    ///
    /// Domain refusals travel in the inner `Result` so callers can tell them
    /// apart from channel failures.
    fn handle_action(&mut self, action: OrderAction) -> Result<Self::ActionResult, FrameworkError> {
        let result = match action {
            OrderAction::CheckStatus => Ok(OrderActionResult::CheckStatus {
                status: self.status,
                cancelled: self.cancelled,
            }),
            OrderAction::Advance => self.advance(),
            OrderAction::Cancel => self.cancel(),
            OrderAction::Accept { washer } => self.accept(washer),
            OrderAction::Decline { washer } => self.decline(washer),
            OrderAction::Rate { rating, review } => self.rate(rating, review),
        };
        Ok(result)
    }
}

impl Order {
    fn advance(&mut self) -> Result<OrderActionResult, OrderError> {
        if self.cancelled {
            return Err(OrderError::Cancelled(self.id.clone()));
        }
        let from = self.status;
        self.status = lifecycle::advance(from);
        Ok(OrderActionResult::Advance { from, to: self.status })
    }

    fn cancel(&mut self) -> Result<OrderActionResult, OrderError> {
        if self.cancelled {
            return Err(OrderError::Cancelled(self.id.clone()));
        }
        if lifecycle::is_completed(OrderStatus::Working, self.status) {
            return Err(OrderError::NotCancellable { id: self.id.clone(), status: self.status });
        }
        self.cancelled = true;
        Ok(OrderActionResult::Cancel)
    }

    fn ensure_open(&self) -> Result<(), OrderError> {
        if self.cancelled {
            return Err(OrderError::Cancelled(self.id.clone()));
        }
        if !self.is_open() {
            return Err(OrderError::NotOpen(self.id.clone()));
        }
        Ok(())
    }

    fn accept(&mut self, washer: String) -> Result<OrderActionResult, OrderError> {
        self.ensure_open()?;
        self.declined_by.retain(|name| name != &washer);
        self.washer = Some(washer);
        self.status = OrderStatus::Assigned;
        Ok(OrderActionResult::Accept { status: self.status })
    }

    fn decline(&mut self, washer: String) -> Result<OrderActionResult, OrderError> {
        self.ensure_open()?;
        if !self.declined_by.contains(&washer) {
            self.declined_by.push(washer);
        }
        Ok(OrderActionResult::Decline)
    }

    fn rate(&mut self, rating: u8, review: Option<String>) -> Result<OrderActionResult, OrderError> {
        if !(1..=5).contains(&rating) {
            return Err(OrderError::InvalidRating(rating));
        }
        if self.cancelled || !self.status.is_terminal() {
            return Err(OrderError::NotRateable { id: self.id.clone(), status: self.status });
        }
        if self.rating.is_some() {
            return Err(OrderError::AlreadyRated(self.id.clone()));
        }
        self.rating = Some(rating);
        self.review = review.filter(|text| !text.trim().is_empty());
        Ok(OrderActionResult::Rate)
    }
}
