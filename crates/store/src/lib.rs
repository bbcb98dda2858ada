//! Cozy Hook client store.
//!
//! The client-side state layer of the Cozy Hook storefront: a local cart
//! ledger, an in-memory catalog cache with fetch-and-reconcile flows, and a
//! facade aggregating both. Data storage, auth, and image hosting belong to
//! the hosted backend behind the catalog gateway; this crate only talks to
//! it over HTTP.
//!
//! # Example
//!
//! ```rust,ignore
//! use cozy_hook_store::{ShopStore, cart::CartAction, config::StoreConfig};
//!
//! let config = StoreConfig::from_env()?;
//! let store = ShopStore::new(&config);
//! store.init().await;
//!
//! let first = store.products().into_iter().next().expect("catalog");
//! store.dispatch(CartAction::Add(first))?;
//! println!("{}", store.cart_total_price());
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod gateway;
pub mod store;

pub use error::{Result, StoreError};
pub use store::ShopStore;
