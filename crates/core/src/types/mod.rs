//! Core types for QuickShop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod phone;
pub mod price;
pub mod product;
pub mod status;

pub use email::{Email, EmailError};
pub use id::{OrderId, ProductId};
pub use phone::{Phone, PhoneError};
pub use price::{Price, PriceError};
pub use product::Product;
pub use status::SubmissionStatus;
