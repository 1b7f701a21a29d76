use tracing::{debug, info, instrument, warn};
use crate::actor_framework::ResourceClient;
use crate::cart::Cart;
use crate::domain::{Category, Price, Product, ProductCreate, ProductPatch};
use crate::filter::search_products;
use crate::product_actor::{ProductAction, ProductActionResult, ProductError};

/// Client for interacting with the Product catalog actor.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

crate::impl_basic_client!(ProductClient, Product, ProductError, product);

impl ProductClient {
    #[instrument(skip(self, product), fields(product_name = %product.name))]
    pub async fn create_product(&self, product: ProductCreate) -> Result<String, ProductError> {
        debug!("Sending request");
        Ok(self.inner.create(product).await?)
    }

    /// Store view: products in `category` (all when `None`) matching `query`.
    #[instrument(skip(self))]
    pub async fn browse(&self, category: Option<Category>, query: &str) -> Result<Vec<Product>, ProductError> {
        let products = self.list_products().await?;
        Ok(search_products(&products, category, query).into_iter().cloned().collect())
    }

    #[instrument(skip(self))]
    pub async fn check_stock(&self, id: String) -> Result<bool, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::CheckStock).await? {
            ProductActionResult::CheckStock(in_stock) => Ok(in_stock),
            _ => Err(ProductError::ActorCommunicationError("Unexpected result".to_string())),
        }
    }

    /// Returns whether availability actually changed.
    #[instrument(skip(self))]
    pub async fn set_stock(&self, id: String, in_stock: bool) -> Result<bool, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::SetStock(in_stock)).await? {
            ProductActionResult::SetStock { changed } => Ok(changed),
            _ => Err(ProductError::ActorCommunicationError("Unexpected result".to_string())),
        }
    }

    #[instrument(skip(self))]
    pub async fn update_price(&self, id: String, price: Price) -> Result<Product, ProductError> {
        debug!("Sending request");
        let patch = ProductPatch { price: Some(price), ..ProductPatch::default() };
        Ok(self.inner.update(id, patch).await?)
    }

    /// Looks the product up and adds one unit of it to `cart`.
    ///
    /// Returns the product's new quantity in the cart.
    #[instrument(skip(self, cart))]
    pub async fn add_to_cart(&self, cart: &mut Cart, id: String) -> Result<u32, ProductError> {
        let product = self
            .get_product(id.clone())
            .await?
            .ok_or_else(|| ProductError::NotFound(id.clone()))?;
        if !product.in_stock {
            warn!("Product out of stock");
            return Err(ProductError::OutOfStock(id));
        }
        cart.add_item(&product);
        let quantity = cart.quantity_of(&id);
        info!(quantity, cart_total = cart.total_price(), "Added to cart");
        Ok(quantity)
    }
}
