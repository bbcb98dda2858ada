//! Cozy Hook Core - Shared types library.
//!
//! This crate provides common types used across all Cozy Hook components:
//! - `store` - Client-side catalog/cart store and gateway client
//! - `cli` - Command-line tool driving the store
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
