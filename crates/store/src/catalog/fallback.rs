//! Built-in fallback catalog data.
//!
//! Used when no live data is available: the sample products stand in when
//! the first product fetch fails, and the legacy category names are
//! substituted when the backend has no category rows at all. See
//! [`crate::catalog::CatalogCache`] for exactly when each applies.

use cozy_hook_core::{CategoryId, Price, ProductId};

use crate::gateway::types::{CategoryEntity, Product};

/// Category names from before categories were backend rows, in display order.
pub const LEGACY_CATEGORY_NAMES: &[&str] =
    &["Amigurumi", "Wearables", "Blankets", "Home Decor", "Seasonal"];

/// Sample catalog shown when the gateway is unreachable before first load.
#[must_use]
pub fn sample_products() -> Vec<Product> {
    vec![
        Product {
            id: ProductId::new("sample-octopus"),
            title: "Clementine the Octopus".to_owned(),
            price: Price::from_cents(2400),
            image: "/samples/clementine.jpg".to_owned(),
            images: vec!["/samples/clementine.jpg".to_owned()],
            category: "Amigurumi".to_owned(),
            description: "Hand-crocheted octopus in peach cotton, eight huggable arms included."
                .to_owned(),
            stock: 3,
            tags: vec!["octopus".to_owned(), "gift".to_owned()],
            featured: true,
            banner: false,
            banner_caption: None,
        },
        Product {
            id: ProductId::new("sample-beanie"),
            title: "Chunky Ribbed Beanie".to_owned(),
            price: Price::from_cents(1800),
            image: "/samples/beanie.jpg".to_owned(),
            images: vec!["/samples/beanie.jpg".to_owned()],
            category: "Wearables".to_owned(),
            description: "Double-stranded merino beanie, one size, very warm.".to_owned(),
            stock: 5,
            tags: vec!["winter".to_owned()],
            featured: false,
            banner: true,
            banner_caption: Some("Made to order in your colour".to_owned()),
        },
        Product {
            id: ProductId::new("sample-granny-throw"),
            title: "Granny Square Throw".to_owned(),
            price: Price::from_cents(9500),
            image: "/samples/granny-throw.jpg".to_owned(),
            images: vec![
                "/samples/granny-throw.jpg".to_owned(),
                "/samples/granny-throw-detail.jpg".to_owned(),
            ],
            category: "Blankets".to_owned(),
            description: "Forty-nine squares of leftover-yarn chaos, joined with love.".to_owned(),
            stock: 1,
            tags: vec!["blanket".to_owned(), "one-of-a-kind".to_owned()],
            featured: true,
            banner: false,
            banner_caption: None,
        },
    ]
}

/// Synthesize category records from the legacy name list, assigning sort
/// order by list position.
#[must_use]
pub fn legacy_categories() -> Vec<CategoryEntity> {
    LEGACY_CATEGORY_NAMES
        .iter()
        .enumerate()
        .map(|(position, name)| CategoryEntity {
            id: CategoryId::new(slug(name)),
            name: (*name).to_owned(),
            sort_order: i64::try_from(position).unwrap_or(i64::MAX),
            created_at: None,
        })
        .collect()
}

/// Lowercase, hyphen-separated form of a display name.
fn slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_categories_sort_orders_follow_list_position() {
        let categories = legacy_categories();
        assert_eq!(categories.len(), LEGACY_CATEGORY_NAMES.len());
        for (position, category) in categories.iter().enumerate() {
            assert_eq!(category.sort_order, position as i64);
            assert_eq!(category.name, LEGACY_CATEGORY_NAMES[position]);
        }
    }

    #[test]
    fn test_legacy_category_ids_are_slugs() {
        let categories = legacy_categories();
        let home = categories
            .iter()
            .find(|c| c.name == "Home Decor")
            .expect("Home Decor in legacy list");
        assert_eq!(home.id.as_str(), "home-decor");
    }

    #[test]
    fn test_sample_products_reference_legacy_categories() {
        // Fallback products must not orphan themselves against the
        // fallback categories.
        for product in sample_products() {
            assert!(
                LEGACY_CATEGORY_NAMES.contains(&product.category.as_str()),
                "sample product {} references unknown category {}",
                product.id,
                product.category
            );
        }
    }
}
