//! Cart to confirmation, end to end.
//!
//! Run with: cargo test -p quickshop-integration-tests --test checkout_flow

#![allow(clippy::unwrap_used)]

use quickshop_core::{Price, ProductId, SubmissionStatus};
use quickshop_integration_tests::{TestContext, sample_catalog};
use quickshop_storefront::checkout::{CheckoutFormState, Field};
use quickshop_storefront::error::AppError;
use quickshop_storefront::order::{Confirmation, Navigation, OrderSubmission};

fn filled_form(name: &str) -> CheckoutFormState {
    let mut form = CheckoutFormState::new();
    form.set(Field::Name, name);
    form.set(Field::Email, "jane@example.com");
    form.set(Field::Phone, "01012345678");
    form.set(Field::Address, "1 Main St");
    form
}

fn rendered(confirmation: Confirmation) -> quickshop_storefront::order::OrderSnapshot {
    match confirmation {
        Confirmation::Render(snapshot) => snapshot,
        Confirmation::Redirect(nav) => panic!("expected a snapshot, redirected to {nav:?}"),
    }
}

// ============================================================================
// Happy path
// ============================================================================

#[tokio::test]
async fn test_order_snapshot_and_confirmation() {
    let ctx = TestContext::new(&sample_catalog()).await;
    let mut session = ctx.session();

    for id in [7, 7, 9] {
        session.add_to_cart(&ProductId::Numeric(id)).await.unwrap();
    }
    assert_eq!(session.cart().item_count(), 3);

    let mut form = filled_form("Jane Doe");
    let mut submission = OrderSubmission::new();
    let nav = session
        .place_order(&mut form, &mut submission)
        .await
        .unwrap();

    assert_eq!(submission.status(), SubmissionStatus::Succeeded);
    assert!(session.cart().is_empty());

    let snapshot = rendered(session.confirmation());
    assert_eq!(nav, Navigation::Confirmation { order_id: snapshot.id });

    let lines: Vec<_> = snapshot
        .items
        .iter()
        .map(|l| (l.product.id.clone(), l.quantity))
        .collect();
    assert_eq!(
        lines,
        vec![(ProductId::Numeric(7), 2), (ProductId::Numeric(9), 1)]
    );

    assert_eq!(snapshot.contact.name, "Jane Doe");
    assert_eq!(snapshot.contact.email.as_str(), "jane@example.com");
    assert_eq!(snapshot.contact.phone.as_str(), "01012345678");
    assert_eq!(snapshot.contact.address, "1 Main St");

    assert_eq!(snapshot.totals.subtotal, Price::from_cents(2500));
    assert_eq!(snapshot.totals.total, Price::from_cents(3300));
}

#[tokio::test]
async fn test_confirmation_survives_new_session_until_overwritten() {
    let ctx = TestContext::new(&sample_catalog()).await;

    let first = {
        let mut session = ctx.session();
        session.add_to_cart(&ProductId::Numeric(7)).await.unwrap();
        session
            .place_order(&mut filled_form("First Shopper"), &mut OrderSubmission::new())
            .await
            .unwrap();
        rendered(session.confirmation())
    };

    // A reload: new session, empty cart, same storage
    let mut session = ctx.session();
    assert!(session.cart().is_empty());
    assert_eq!(rendered(session.confirmation()), first);
    assert_eq!(rendered(session.confirmation()), first);

    session.add_to_cart(&ProductId::Numeric(3)).await.unwrap();
    session
        .place_order(&mut filled_form("Second Shopper"), &mut OrderSubmission::new())
        .await
        .unwrap();

    let second = rendered(session.confirmation());
    assert_ne!(second.id, first.id);
    assert_eq!(second.contact.name, "Second Shopper");
    assert_eq!(second.items.len(), 1);
    assert_eq!(second.items[0].product.id, ProductId::Numeric(3));
}

#[tokio::test]
async fn test_confirmation_without_order_redirects_home() {
    let ctx = TestContext::new(&sample_catalog()).await;
    let session = ctx.session();

    assert_eq!(
        session.confirmation(),
        Confirmation::Redirect(Navigation::Home)
    );
    assert!(!ctx.snapshot_path().exists());
}

// ============================================================================
// Failures keep the cart
// ============================================================================

#[tokio::test]
async fn test_invalid_contact_blocks_submission() {
    let ctx = TestContext::new(&sample_catalog()).await;
    let mut session = ctx.session();
    session.add_to_cart(&ProductId::Numeric(7)).await.unwrap();

    let mut form = filled_form("Jane Doe");
    form.set(Field::Email, "not-an-email");
    form.set(Field::Phone, "12345");
    let mut submission = OrderSubmission::new();

    let err = session
        .place_order(&mut form, &mut submission)
        .await
        .unwrap_err();
    let AppError::Validation(errors) = err else {
        panic!("expected validation error, got {err:?}");
    };

    assert_eq!(errors.len(), 2);
    assert_eq!(errors.get(Field::Email), Some("Invalid email"));
    assert_eq!(
        errors.get(Field::Phone),
        Some("Phone number must be 11 digits")
    );
    assert_eq!(submission.status(), SubmissionStatus::Idle);
    assert_eq!(session.cart().len(), 1);
    assert!(!ctx.snapshot_path().exists());

    // Fixing the fields lets the same submission go through
    form.set(Field::Email, "jane@example.com");
    form.set(Field::Phone, "01012345678");
    session
        .place_order(&mut form, &mut submission)
        .await
        .unwrap();
    assert_eq!(submission.status(), SubmissionStatus::Succeeded);
}

#[tokio::test]
async fn test_empty_cart_cannot_check_out() {
    let ctx = TestContext::new(&sample_catalog()).await;
    let mut session = ctx.session();

    let err = session
        .place_order(&mut filled_form("Jane Doe"), &mut OrderSubmission::new())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::EmptyCart));
    assert_eq!(err.notice().message, "Your cart is empty.");
}

#[tokio::test]
async fn test_cart_edits_before_checkout() {
    let ctx = TestContext::new(&sample_catalog()).await;
    let mut session = ctx.session();

    for id in [1, 3, 7, 3] {
        session.add_to_cart(&ProductId::Numeric(id)).await.unwrap();
    }

    // Drop the backpack, bump the ring line to 4
    let removed = session.cart_mut().remove(0).unwrap();
    assert_eq!(removed.product.id, ProductId::Numeric(1));
    assert!(session.cart_mut().set_quantity(1, 4));
    assert!(session.cart_mut().remove(10).is_none());

    session
        .place_order(&mut filled_form("Jane Doe"), &mut OrderSubmission::new())
        .await
        .unwrap();

    let snapshot = rendered(session.confirmation());
    let lines: Vec<_> = snapshot
        .items
        .iter()
        .map(|l| (l.product.id.clone(), l.quantity))
        .collect();
    assert_eq!(
        lines,
        vec![(ProductId::Numeric(3), 2), (ProductId::Numeric(7), 4)]
    );
    // 2 x 55.99 + 4 x 10.00
    assert_eq!(snapshot.totals.subtotal, Price::from_cents(15198));
}
