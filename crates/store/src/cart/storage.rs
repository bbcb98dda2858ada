//! Durable persistence for the cart ledger.
//!
//! One local record holds the serialized cart and only the cart - catalog
//! data is never persisted. The record is written synchronously on every
//! mutation; there is exactly one writer (this process) and no cross-process
//! coordination. Lines survive across sessions and never expire on their
//! own; they leave the record only through an explicit remove or clear.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::CartItem;

/// Errors writing the cart record.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("cart storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cart serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// File-backed store for the serialized cart.
#[derive(Debug, Clone)]
pub struct CartStorage {
    path: PathBuf,
}

impl CartStorage {
    /// Create a store over the given record path.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Path of the record file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted cart lines.
    ///
    /// A missing record means an empty cart. An unreadable or corrupt
    /// record is logged and treated as empty rather than failing the
    /// session.
    #[must_use]
    pub fn load(&self) -> Vec<CartItem> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "cart record unreadable; starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "cart record corrupt; starting empty");
                Vec::new()
            }
        }
    }

    /// Write the cart lines, replacing the record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be serialized or written.
    pub fn save(&self, items: &[CartItem]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let bytes = serde_json::to_vec_pretty(items)?;
        fs::write(&self.path, bytes)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cozy_hook_core::{Price, ProductId};
    use uuid::Uuid;

    use super::*;
    use crate::gateway::types::Product;

    fn scratch_path() -> PathBuf {
        std::env::temp_dir().join(format!("cozy-hook-cart-{}.json", Uuid::new_v4()))
    }

    fn item(id: &str, quantity: u32) -> CartItem {
        CartItem {
            product: Product {
                id: ProductId::new(id),
                title: "Octopus".to_owned(),
                price: Price::from_cents(2400),
                image: String::new(),
                images: Vec::new(),
                category: "Amigurumi".to_owned(),
                description: String::new(),
                stock: 3,
                tags: Vec::new(),
                featured: false,
                banner: false,
                banner_caption: None,
            },
            quantity,
        }
    }

    #[test]
    fn test_missing_record_loads_empty() {
        let storage = CartStorage::new(scratch_path());
        assert!(storage.load().is_empty());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let path = scratch_path();
        let storage = CartStorage::new(path.clone());

        let items = vec![item("p1", 2), item("p2", 1)];
        storage.save(&items).unwrap();

        assert_eq!(storage.load(), items);
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_corrupt_record_loads_empty() {
        let path = scratch_path();
        fs::write(&path, b"{ not json").unwrap();

        let storage = CartStorage::new(path.clone());
        assert!(storage.load().is_empty());
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = std::env::temp_dir().join(format!("cozy-hook-{}", Uuid::new_v4()));
        let path = dir.join("nested").join("cart.json");

        let storage = CartStorage::new(path.clone());
        storage.save(&[item("p1", 1)]).unwrap();

        assert_eq!(storage.load().len(), 1);
        fs::remove_dir_all(dir).unwrap();
    }
}
