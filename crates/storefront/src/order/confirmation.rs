//! Order confirmation read path.

use std::fmt;

use tracing::{debug, warn};

use super::{Navigation, OrderSnapshot, OrderStore, StorageError};
use crate::error::AppError;

/// What the confirmation page should do on entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    /// Show the stored order, read-only.
    Render(OrderSnapshot),
    /// Nothing to show; go elsewhere without an error message.
    Redirect(Navigation),
}

/// Read the last order for the confirmation page.
///
/// Reading never consumes or modifies the snapshot, so entering the page
/// again shows the same order until a new one replaces it. A missing or
/// unreadable snapshot redirects home.
#[must_use]
pub fn load_confirmation<S: OrderStore + ?Sized>(store: &S) -> Confirmation {
    match store.read() {
        Ok(Some(snapshot)) => Confirmation::Render(snapshot),
        Ok(None) => {
            debug!("No order snapshot, redirecting home");
            Confirmation::Redirect(Navigation::Home)
        }
        Err(e @ StorageError::Corrupt { .. }) => {
            warn!(error = %e, "Ignoring corrupt order snapshot");
            Confirmation::Redirect(Navigation::Home)
        }
        Err(e) => {
            let _ = AppError::Storage(e).report();
            Confirmation::Redirect(Navigation::Home)
        }
    }
}

/// Plain-text rendering of a placed order.
pub struct OrderSummary<'a>(pub &'a OrderSnapshot);

impl fmt::Display for OrderSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.0;
        let contact = &snapshot.contact;

        writeln!(f, "Order {}", snapshot.id)?;
        writeln!(f, "Placed {}", snapshot.placed_at.format("%Y-%m-%d %H:%M UTC"))?;
        writeln!(f)?;
        writeln!(f, "Name:    {}", contact.name)?;
        writeln!(f, "Email:   {}", contact.email)?;
        writeln!(f, "Phone:   {}", contact.phone)?;
        writeln!(f, "Address: {}", contact.address)?;
        writeln!(f)?;

        for line in &snapshot.items {
            let label = format!("{} x{}", line.product.title, line.quantity);
            writeln!(f, "{label:<40} {:>10}", line.line_total().to_string())?;
        }

        let totals = &snapshot.totals;
        writeln!(f)?;
        writeln!(f, "{:<40} {:>10}", "Subtotal", totals.subtotal.to_string())?;
        writeln!(f, "{:<40} {:>10}", "Shipping", totals.shipping.to_string())?;
        writeln!(f, "{:<40} {:>10}", "Taxes", totals.taxes.to_string())?;
        write!(f, "{:<40} {:>10}", "Total", totals.total.to_string())
    }
}
