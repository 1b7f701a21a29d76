use crate::actor_framework::{Entity, FrameworkError};
use crate::domain::{Product, ProductCreate, ProductPatch};
use super::actions::{ProductAction, ProductActionResult};

impl Entity for Product {
    type Id = String;
    type CreateParams = ProductCreate;
    type Patch = ProductPatch;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;

    /// Creates a new catalog entry. New products start in stock.
    ///
    /// # Errors
    /// Rejects a blank name or an original price below the selling price.
    fn from_create_params(id: String, params: ProductCreate) -> Result<Self, FrameworkError> {
        if params.name.trim().is_empty() {
            return Err(FrameworkError::Rejected("product name required".to_string()));
        }
        if params.original_price < params.price {
            return Err(FrameworkError::Rejected(format!(
                "original price {} below price {}",
                params.original_price, params.price
            )));
        }
        Ok(Self {
            id,
            name: params.name,
            description: params.description,
            price: params.price,
            original_price: params.original_price,
            category: params.category,
            rating: params.rating,
            in_stock: true,
        })
    }

    /// Updates the product's price and/or availability.
    ///
    /// A new price above the original price raises the original price with it,
    /// so the product never shows a negative discount.
    fn on_update(&mut self, patch: ProductPatch) -> Result<(), FrameworkError> {
        if let Some(price) = patch.price {
            self.price = price;
            self.original_price = self.original_price.max(price);
        }
        if let Some(in_stock) = patch.in_stock {
            self.in_stock = in_stock;
        }
        Ok(())
    }

    fn handle_action(&mut self, action: ProductAction) -> Result<ProductActionResult, FrameworkError> {
        match action {
            ProductAction::CheckStock => Ok(ProductActionResult::CheckStock(self.in_stock)),
            ProductAction::SetStock(in_stock) => {
                let changed = self.in_stock != in_stock;
                self.in_stock = in_stock;
                Ok(ProductActionResult::SetStock { changed })
            }
        }
    }
}
