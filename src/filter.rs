//! Tag-based selection shared by every list view.

use crate::domain::{Category, Product};

/// Key that matches every record regardless of its tag.
pub const ALL: &str = "all";

/// Records that expose named string tags for filtering.
pub trait Tagged {
    /// Value of the tag called `field`, or `None` when the record has no such tag.
    fn tag(&self, field: &str) -> Option<&str>;
}

/// Records whose `tag_field` equals `selected`, in their original order.
///
/// [`ALL`] selects the whole collection.
pub fn filter_by_tag<'a, T: Tagged>(items: &'a [T], tag_field: &str, selected: &str) -> Vec<&'a T> {
    items
        .iter()
        .filter(|item| selected == ALL || item.tag(tag_field) == Some(selected))
        .collect()
}

/// Store browsing: category selection plus a case-insensitive substring
/// search over name and description. The query is matched as typed, so an
/// empty query matches every product and a blank one only matches text that
/// contains it.
pub fn search_products<'a>(
    products: &'a [Product],
    category: Option<Category>,
    query: &str,
) -> Vec<&'a Product> {
    let selected = category.map(Category::as_str).unwrap_or(ALL);
    let needle = query.to_lowercase();
    filter_by_tag(products, "category", selected)
        .into_iter()
        .filter(|product| {
            product.name.to_lowercase().contains(&needle)
                || product.description.to_lowercase().contains(&needle)
        })
        .collect()
}
