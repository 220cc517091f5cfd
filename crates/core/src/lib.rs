//! QuickShop Core - Shared value types.
//!
//! This crate provides the types every QuickShop component agrees on:
//! - `storefront` - Catalog client, cart, checkout, and order submission
//! - `cli` - Command-line presentation of the storefront
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no storage,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for identifiers, prices, emails, phones, and products

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
