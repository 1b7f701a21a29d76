use crate::lifecycle::OrderStatus;

/// Custom actions for Order entities.
///
/// Every status change goes through these, so the order service stays the
/// only owner of an order's status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderAction {
    /// Reads the current status without changing it.
    CheckStatus,
    /// Moves the order to the next lifecycle stage.
    ///
    /// # Errors
    /// Fails on a cancelled order. A completed order stays completed.
    Advance,
    /// Archives the order as cancelled.
    ///
    /// # Errors
    /// Fails once the washer has started working.
    Cancel,
    /// A washer takes an open order, moving it to `assigned`.
    ///
    /// # Errors
    /// Fails unless the order is still open.
    Accept { washer: String },
    /// A washer turns down an open order. It stays open for everyone else.
    Decline { washer: String },
    /// The customer rates a completed wash, at most once.
    Rate { rating: u8, review: Option<String> },
}

impl OrderAction {
    pub fn name(&self) -> &'static str {
        match self {
            OrderAction::CheckStatus => "check_status",
            OrderAction::Advance => "advance",
            OrderAction::Cancel => "cancel",
            OrderAction::Accept { .. } => "accept",
            OrderAction::Decline { .. } => "decline",
            OrderAction::Rate { .. } => "rate",
        }
    }
}

/// Results from OrderActions - variants match 1:1 with OrderAction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderActionResult {
    CheckStatus { status: OrderStatus, cancelled: bool },
    Advance { from: OrderStatus, to: OrderStatus },
    Cancel,
    Accept { status: OrderStatus },
    Decline,
    Rate,
}
