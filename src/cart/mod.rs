//! Shopping cart aggregation.
//!
//! A [`Cart`] keeps at most one [`CartLine`] per product id, in the order the
//! products were first added. Totals are derived on demand.

use crate::domain::{Price, Product};

/// One product and how many of it are in the cart. `quantity` is never 0.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    pub fn subtotal(&self) -> Price {
        self.product.price.saturating_mul(Price::from(self.quantity))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Quantity held for `product_id`, 0 when absent.
    pub fn quantity_of(&self, product_id: &str) -> u32 {
        self.position(product_id)
            .map(|i| self.lines[i].quantity)
            .unwrap_or(0)
    }

    /// Adds one unit of `product`, creating its line on first add.
    pub fn add_item(&mut self, product: &Product) {
        match self.position(&product.id) {
            Some(i) => self.lines[i].quantity = self.lines[i].quantity.saturating_add(1),
            None => self.lines.push(CartLine {
                product: product.clone(),
                quantity: 1,
            }),
        }
    }

    /// Takes one unit of `product_id` out of the cart, dropping the line at 0.
    ///
    /// Returns the remaining quantity, or `None` if the product was not in
    /// the cart.
    pub fn decrement_item(&mut self, product_id: &str) -> Option<u32> {
        let i = self.position(product_id)?;
        if self.lines[i].quantity > 1 {
            self.lines[i].quantity -= 1;
            Some(self.lines[i].quantity)
        } else {
            self.lines.remove(i);
            Some(0)
        }
    }

    /// Removes the whole line for `product_id`.
    pub fn remove_item(&mut self, product_id: &str) -> Option<CartLine> {
        let i = self.position(product_id)?;
        Some(self.lines.remove(i))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Saturates at `Price::MAX` rather than wrapping.
    pub fn total_price(&self) -> Price {
        self.lines
            .iter()
            .map(CartLine::subtotal)
            .fold(0, Price::saturating_add)
    }

    pub fn total_item_count(&self) -> u32 {
        self.lines
            .iter()
            .map(|line| line.quantity)
            .fold(0, u32::saturating_add)
    }

    fn position(&self, product_id: &str) -> Option<usize> {
        self.lines.iter().position(|line| line.product.id == product_id)
    }
}

/// Functional form of [`Cart::add_item`].
pub fn add_item(mut cart: Cart, product: &Product) -> Cart {
    cart.add_item(product);
    cart
}

pub fn total_price(cart: &Cart) -> Price {
    cart.total_price()
}

pub fn total_item_count(cart: &Cart) -> u32 {
    cart.total_item_count()
}
