//! Checkout and order confirmation pages.

use quickshop_core::ProductId;
use quickshop_storefront::checkout::{CheckoutFormState, Field};
use quickshop_storefront::error::{AppError, Notice};
use quickshop_storefront::order::{
    Confirmation, Navigation, ORDER_PLACED, OrderStore, OrderSubmission, OrderSummary,
};
use quickshop_storefront::services::Notifier;
use quickshop_storefront::state::Session;

use crate::output;

/// Checkout form values as given on the command line.
pub struct ContactArgs {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl ContactArgs {
    fn into_form(self) -> CheckoutFormState {
        let mut form = CheckoutFormState::new();
        form.set(Field::Name, self.name);
        form.set(Field::Email, self.email);
        form.set(Field::Phone, self.phone);
        form.set(Field::Address, self.address);
        form
    }
}

/// Add each product to the cart, then check out.
pub async fn place<S: OrderStore, N: Notifier>(
    session: &mut Session<S, N>,
    products: &[ProductId],
    contact: ContactArgs,
) -> bool {
    for id in products {
        if let Err(e) = session.add_to_cart(id).await {
            output::notice(&e.report());
            return false;
        }
    }

    output::line(&format!(
        "Cart: {} item(s), subtotal {}",
        session.cart().item_count(),
        session.cart().subtotal()
    ));

    let mut form = contact.into_form();
    let mut submission = OrderSubmission::new();

    match session.place_order(&mut form, &mut submission).await {
        Ok(Navigation::Confirmation { .. }) => {
            output::notice(&Notice::success(ORDER_PLACED));
            render_confirmation(session)
        }
        Ok(Navigation::Home) => super::catalog::home(session).await,
        Err(AppError::Validation(_)) => {
            for field in Field::ALL {
                if let Some(message) = form.visible_error(field) {
                    output::fatal(&format!("{field}: {message}"));
                }
            }
            false
        }
        Err(e) => {
            output::notice(&e.report());
            false
        }
    }
}

/// Enter the confirmation page.
pub async fn confirmation<S: OrderStore, N: Notifier>(session: &Session<S, N>) -> bool {
    if render_confirmation(session) {
        return true;
    }
    tracing::debug!("No recent order, redirecting home");
    super::catalog::home(session).await
}

/// Print the stored order. Returns `false` if there is none.
fn render_confirmation<S: OrderStore, N: Notifier>(session: &Session<S, N>) -> bool {
    match session.confirmation() {
        Confirmation::Render(snapshot) => {
            output::line(&OrderSummary(&snapshot).to_string());
            true
        }
        Confirmation::Redirect(_) => false,
    }
}
