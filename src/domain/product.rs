use super::Price;
use crate::filter::Tagged;

/// Catalog sections of the care-product store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Wash,
    Lube,
    Accessories,
    Helmets,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Wash => "wash",
            Category::Lube => "lube",
            Category::Accessories => "accessories",
            Category::Helmets => "helmets",
        }
    }
}

/// Represents a product in the store catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub original_price: Price,
    pub category: Category,
    pub rating: f32,
    pub in_stock: bool,
}

/// Payload for adding a product to the catalog.
#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub original_price: Price,
    pub category: Category,
    pub rating: f32,
}

/// Payload for updating an existing product.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub price: Option<Price>,
    pub in_stock: Option<bool>,
}

impl Product {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Price,
        category: Category,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price,
            original_price: price,
            category,
            rating: 0.0,
            in_stock: true,
        }
    }

    /// Percentage off the original price, rounded half up.
    ///
    /// `None` when the product is not discounted.
    pub fn discount_percent(&self) -> Option<u64> {
        if self.original_price <= self.price {
            return None;
        }
        let original = u128::from(self.original_price);
        let off = u128::from(self.original_price - self.price) * 100;
        let percent = (off * 2 + original) / (original * 2);
        Some(u64::try_from(percent).unwrap_or(100))
    }
}

impl ProductCreate {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: Price,
        original_price: Price,
        category: Category,
        rating: f32,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            price,
            original_price,
            category,
            rating,
        }
    }
}

impl Tagged for Product {
    fn tag(&self, field: &str) -> Option<&str> {
        match field {
            "category" => Some(self.category.as_str()),
            _ => None,
        }
    }
}

/// The store's starting catalog.
pub fn default_catalog() -> Vec<ProductCreate> {
    vec![
        ProductCreate::new(
            "Waterless Wash Solution",
            "Professional waterless wash solution for bikes",
            299,
            399,
            Category::Wash,
            4.5,
        ),
        ProductCreate::new(
            "Chain Lubricant",
            "High-quality chain lubricant for smooth operation",
            199,
            249,
            Category::Lube,
            4.3,
        ),
        ProductCreate::new(
            "Tire Shine Spray",
            "Long-lasting tire shine and protection",
            149,
            199,
            Category::Wash,
            4.2,
        ),
        ProductCreate::new(
            "Bike Cover",
            "Waterproof bike cover for protection",
            399,
            499,
            Category::Accessories,
            4.4,
        ),
        ProductCreate::new(
            "Safety Helmet",
            "ISI certified safety helmet",
            899,
            1299,
            Category::Helmets,
            4.6,
        ),
        ProductCreate::new(
            "Microfiber Cloth Set",
            "Set of 3 microfiber cleaning cloths",
            199,
            299,
            Category::Accessories,
            4.1,
        ),
    ]
}
