//! Wire types for the catalog gateway API.
//!
//! These structs mirror the JSON records the hosted backend returns. The
//! backend owns the schema; this side only deserializes what it is given.

use chrono::{DateTime, Utc};
use cozy_hook_core::{CategoryId, Price, ProductId};
use serde::{Deserialize, Serialize};

/// A catalog product.
///
/// Products are created and deleted only through the admin flow and mutated
/// wholesale - there is no partial-field update path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    /// Primary image URL shown in listings.
    pub image: String,
    /// Ordered gallery of image URLs.
    #[serde(default)]
    pub images: Vec<String>,
    /// Category display name. Free text, denormalized - NOT a foreign key.
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Shown in the featured strip on the landing page.
    #[serde(default)]
    pub featured: bool,
    /// Shown in the rotating hero banner.
    #[serde(default)]
    pub banner: bool,
    #[serde(default)]
    pub banner_caption: Option<String>,
}

/// A catalog category.
///
/// Categories are independent of products: association is by matching name
/// strings, not by identifier. Renaming or deleting a category silently
/// orphans the products that still reference its old name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryEntity {
    pub id: CategoryId,
    pub name: String,
    /// Display precedence; lower sorts first.
    pub sort_order: i64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for creating a product through the admin flow.
#[derive(Debug, Clone, Serialize)]
pub struct NewProduct {
    pub title: String,
    pub price: Price,
    pub image: String,
    pub images: Vec<String>,
    pub category: String,
    pub description: String,
    pub stock: u32,
    pub tags: Vec<String>,
    pub featured: bool,
    pub banner: bool,
    pub banner_caption: Option<String>,
}

/// Payload for creating a category through the admin flow.
#[derive(Debug, Clone, Serialize)]
pub struct NewCategory {
    pub name: String,
    pub sort_order: i64,
}

/// One entry of a full category reorder request.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryOrderUpdate {
    pub id: CategoryId,
    pub sort_order: i64,
}

/// An image to upload to public object storage.
///
/// Bytes are base64-encoded on the wire; the gateway stores the decoded
/// bytes under a fixed public prefix and returns the resulting URL.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Response to a successful image upload.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedImage {
    pub url: String,
}

/// Error object the gateway returns alongside a non-success status.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Best human-readable message out of the two fields the backend uses.
    #[must_use]
    pub fn into_message(self) -> Option<String> {
        self.error.or(self.message)
    }
}

/// Promotion flag filter for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromoKind {
    Featured,
    Banner,
}

impl PromoKind {
    /// Value of the `type` query parameter.
    #[must_use]
    pub const fn as_query_value(self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::Banner => "banner",
        }
    }
}

/// Optional server-side filters for a product listing request.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub promo: Option<PromoKind>,
    pub category: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_deserializes_with_sparse_record() {
        // Older rows carry only the columns the first schema had.
        let json = r#"{
            "id": "prod-1",
            "title": "Clementine the Octopus",
            "price": "24.00",
            "image": "https://cdn.example/octopus.jpg",
            "category": "Amigurumi"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id.as_str(), "prod-1");
        assert!(product.images.is_empty());
        assert!(product.tags.is_empty());
        assert!(!product.featured);
        assert!(!product.banner);
        assert_eq!(product.banner_caption, None);
        assert_eq!(product.stock, 0);
    }

    #[test]
    fn test_category_created_at_is_optional() {
        let json = r#"{"id": "cat-1", "name": "Wearables", "sort_order": 2}"#;
        let category: CategoryEntity = serde_json::from_str(json).unwrap();
        assert_eq!(category.created_at, None);
        assert_eq!(category.sort_order, 2);
    }

    #[test]
    fn test_error_body_prefers_error_field() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"error": "nope", "message": "also nope"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("nope"));
    }
}
