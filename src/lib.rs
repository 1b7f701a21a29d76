//! # bikewash
//!
//! Core of a bike-wash marketplace where customers book washes and buy care
//! products, and washers fulfill the bookings.
//!
//! - [`lifecycle`] - the five order stages and the pure transitions between them
//! - [`cart`] - cart lines, quantities and totals
//! - [`filter`] - the tag filter shared by history, washer queue and store views
//! - [`booking`] - wash services, form validation and the platform fee
//! - [`tracker`] - the cancellable task that advances an order on a timer
//! - [`app_system`] - actor startup, configuration, tracing and shutdown
//!
//! Orders and products live in [`actor_framework::ResourceActor`]s and are
//! reached through the typed [`clients`].

pub mod actor_framework;
pub mod app_system;
pub mod booking;
pub mod cart;
pub mod clients;
pub mod domain;
pub mod filter;
pub mod lifecycle;
pub mod order_actor;
pub mod product_actor;
pub mod tracker;

#[cfg(test)]
mod mock_framework;
