//! Outbound services used by the storefront.
//!
//! # Services
//!
//! - `notify` - Order confirmation emails via an external email service

pub mod notify;

pub use notify::{EmailNotifier, Notifier, NotifyError, OrderNotification};
