//! Order lifecycle stages and the pure transitions between them.
//!
//! An order moves through a closed, ordered set of stages:
//!
//! ```text
//! confirmed -> assigned -> arriving -> working -> completed
//! ```
//!
//! There is no skipping and no regression. `completed` is terminal, so
//! advancing it again yields `completed`.

pub mod error;

pub use error::*;

use std::fmt;
use std::str::FromStr;

/// One of the five lifecycle stages of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OrderStatus {
    Confirmed,
    Assigned,
    Arriving,
    Working,
    Completed,
}

impl OrderStatus {
    /// All stages in lifecycle order.
    pub const SEQUENCE: [OrderStatus; 5] = [
        OrderStatus::Confirmed,
        OrderStatus::Assigned,
        OrderStatus::Arriving,
        OrderStatus::Working,
        OrderStatus::Completed,
    ];

    /// Position of the stage in [`OrderStatus::SEQUENCE`].
    pub fn index(self) -> usize {
        match self {
            OrderStatus::Confirmed => 0,
            OrderStatus::Assigned => 1,
            OrderStatus::Arriving => 2,
            OrderStatus::Working => 3,
            OrderStatus::Completed => 4,
        }
    }

    /// The following stage, or `None` at the terminal stage.
    pub fn next(self) -> Option<OrderStatus> {
        Self::SEQUENCE.get(self.index() + 1).copied()
    }

    pub fn is_terminal(self) -> bool {
        self == OrderStatus::Completed
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Assigned => "assigned",
            OrderStatus::Arriving => "arriving",
            OrderStatus::Working => "working",
            OrderStatus::Completed => "completed",
        }
    }

    /// Title shown on the tracking timeline.
    pub fn title(self) -> &'static str {
        match self {
            OrderStatus::Confirmed => "Order Confirmed",
            OrderStatus::Assigned => "Washer Assigned",
            OrderStatus::Arriving => "Washer Arriving",
            OrderStatus::Working => "Service in Progress",
            OrderStatus::Completed => "Service Completed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = LifecycleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::SEQUENCE
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| LifecycleError::InvalidStatus(s.to_string()))
    }
}

/// Returns the stage after `current`; the terminal stage maps to itself.
pub fn advance(current: OrderStatus) -> OrderStatus {
    current.next().unwrap_or(current)
}

/// True when `stage` has been reached by an order sitting at `current`.
pub fn is_completed(stage: OrderStatus, current: OrderStatus) -> bool {
    stage.index() <= current.index()
}

/// String-level [`advance`] for callers holding raw status values.
pub fn advance_str(current: &str) -> Result<OrderStatus, LifecycleError> {
    Ok(advance(current.parse()?))
}

/// String-level [`is_completed`]. Both arguments must name a known stage.
pub fn is_completed_str(stage: &str, current: &str) -> Result<bool, LifecycleError> {
    Ok(is_completed(stage.parse()?, current.parse()?))
}

/// A stage projected for display against the current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusStep {
    pub stage: OrderStatus,
    pub title: &'static str,
    pub completed: bool,
}

/// Timeline for an order at `current`, one step per stage in order.
pub fn status_steps(current: OrderStatus) -> [StatusStep; 5] {
    OrderStatus::SEQUENCE.map(|stage| StatusStep {
        stage,
        title: stage.title(),
        completed: is_completed(stage, current),
    })
}
