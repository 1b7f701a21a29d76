//! Wash service catalog, booking validation and pricing.

pub mod error;

pub use error::*;

use crate::domain::{OrderCreate, PaymentMethod, Price};

/// A bookable wash package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WashService {
    pub name: &'static str,
    pub price: Price,
    pub duration_minutes: u32,
    pub description: &'static str,
}

pub const WASH_SERVICES: [WashService; 3] = [
    WashService {
        name: "Basic Wash",
        price: 150,
        duration_minutes: 30,
        description: "Waterless wash with basic cleaning",
    },
    WashService {
        name: "Premium Wash",
        price: 250,
        duration_minutes: 45,
        description: "Complete wash with detailing",
    },
    WashService {
        name: "Deluxe Package",
        price: 400,
        duration_minutes: 60,
        description: "Complete bike care package",
    },
];

pub const TIME_SLOTS: [&str; 12] = [
    "09:00 AM", "10:00 AM", "11:00 AM", "12:00 PM", "01:00 PM", "02:00 PM",
    "03:00 PM", "04:00 PM", "05:00 PM", "06:00 PM", "07:00 PM", "08:00 PM",
];

/// Marketplace share of a service price, in percent.
pub const PLATFORM_FEE_PERCENT: Price = 10;

pub fn find_service(name: &str) -> Option<WashService> {
    WASH_SERVICES.iter().copied().find(|s| s.name == name)
}

/// 10% of `price`, rounded half up.
pub fn platform_fee(price: Price) -> Price {
    let fee = (u128::from(price) * u128::from(PLATFORM_FEE_PERCENT) + 50) / 100;
    // At most a tenth of `price`, so it always fits back.
    Price::try_from(fee).unwrap_or(Price::MAX)
}

/// What a washer takes home from a service at `price`.
pub fn washer_earnings(price: Price) -> Price {
    price - platform_fee(price)
}

/// Price breakdown shown before the customer confirms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub price: Price,
    pub platform_fee: Price,
    pub total: Price,
}

impl Quote {
    pub fn for_price(price: Price) -> Self {
        let platform_fee = platform_fee(price);
        Self {
            price,
            platform_fee,
            total: price.saturating_add(platform_fee),
        }
    }
}

/// Everything the customer fills in on the booking form.
#[derive(Debug, Clone, Default)]
pub struct BookingRequest {
    pub customer: String,
    pub service: Option<WashService>,
    pub date: String,
    pub time_slot: Option<String>,
    pub address: String,
    pub bike_number: String,
    pub special_instructions: Option<String>,
    pub payment_method: PaymentMethod,
}

impl BookingRequest {
    /// Checks the form fields in the order the form presents them.
    pub fn validate(&self) -> Result<WashService, BookingError> {
        let service = self.service.ok_or(BookingError::MissingService)?;
        if self.address.trim().is_empty() {
            return Err(BookingError::MissingAddress);
        }
        if self.bike_number.trim().is_empty() {
            return Err(BookingError::MissingBikeNumber);
        }
        match self.time_slot.as_deref() {
            None | Some("") => Err(BookingError::MissingTimeSlot),
            Some(slot) if !TIME_SLOTS.iter().any(|known| *known == slot) => {
                Err(BookingError::UnknownTimeSlot(slot.to_string()))
            }
            Some(_) => Ok(service),
        }
    }

    pub fn quote(&self) -> Result<Quote, BookingError> {
        self.validate().map(|service| Quote::for_price(service.price))
    }

    /// Validates and turns the form into an order payload.
    pub fn into_order(self) -> Result<OrderCreate, BookingError> {
        let service = self.validate()?;
        let quote = Quote::for_price(service.price);
        let special_instructions = self
            .special_instructions
            .filter(|text| !text.trim().is_empty());
        Ok(OrderCreate {
            customer: self.customer,
            service: service.name.to_string(),
            price: quote.price,
            platform_fee: quote.platform_fee,
            date: self.date,
            time: self.time_slot.unwrap_or_default(),
            address: self.address.trim().to_string(),
            bike_number: self.bike_number.trim().to_string(),
            special_instructions,
            payment_method: self.payment_method,
        })
    }
}
