//! QuickShop storefront library.
//!
//! Product browsing, a shopping cart, checkout validation, order submission,
//! and the order confirmation read path. Presentation layers (the CLI, or
//! anything else) drive it through [`state::Session`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod order;
pub mod page;
pub mod services;
pub mod state;
