/// Custom actions for Product entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductAction {
    /// Reports whether the product can be added to a cart.
    CheckStock,
    /// Marks the product sold out or back in stock.
    SetStock(bool),
}

/// Results from ProductActions - variants match 1:1 with ProductAction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductActionResult {
    CheckStock(bool),
    SetStock { changed: bool },
}
