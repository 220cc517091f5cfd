//! Orders: totals, the persisted snapshot, submission, and confirmation.
//!
//! # Flow
//!
//! ```text
//! CartStore ──merge──▶ OrderSubmission ──notify?──▶ OrderStore::write ──▶ Confirmation
//! ```
//!
//! A snapshot is written exactly once per successful submission, under one
//! well-known key, replacing whatever was there before. The confirmation
//! path only ever reads it.

mod confirmation;
mod storage;
mod submit;

pub use confirmation::{Confirmation, OrderSummary, load_confirmation};
pub use storage::{FileOrderStore, MemoryOrderStore, OrderStore, StorageError};
pub use submit::{Navigation, ORDER_PLACED, OrderSubmission};

use chrono::{DateTime, Utc};
use quickshop_core::{OrderId, Price};
use serde::{Deserialize, Serialize};

use crate::cart::CartLineItem;
use crate::checkout::ContactInfo;
use crate::config::TotalsPolicy;

/// Derived order amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: Price,
    pub shipping: Price,
    pub taxes: Price,
    pub total: Price,
}

impl OrderTotals {
    /// Sum the line totals and add the flat fees from `policy`.
    #[must_use]
    pub fn compute(items: &[CartLineItem], policy: TotalsPolicy) -> Self {
        let subtotal: Price = items.iter().map(CartLineItem::line_total).sum();
        Self {
            subtotal,
            shipping: policy.shipping,
            taxes: policy.taxes,
            total: subtotal + policy.shipping + policy.taxes,
        }
    }
}

/// The record of a placed order, as shown on the confirmation page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSnapshot {
    pub id: OrderId,
    pub placed_at: DateTime<Utc>,
    pub contact: ContactInfo,
    /// Merged line items at the moment of submission.
    pub items: Vec<CartLineItem>,
    pub totals: OrderTotals,
}

impl OrderSnapshot {
    /// Capture a new snapshot stamped with a fresh id and the current time.
    #[must_use]
    pub fn capture(contact: ContactInfo, items: Vec<CartLineItem>, totals: OrderTotals) -> Self {
        Self {
            id: OrderId::generate(),
            placed_at: Utc::now(),
            contact,
            items,
            totals,
        }
    }
}
