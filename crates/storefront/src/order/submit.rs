//! Order submission state machine.
//!
//! ```text
//! Idle ──submit──▶ Submitting ──▶ Succeeded
//!                       │
//!                       └───────▶ Failed ──submit──▶ Submitting ...
//! ```
//!
//! A failure at any step leaves the cart exactly as it was so the shopper
//! can resubmit. Only a written snapshot clears the cart. A submission whose
//! future is dropped mid-flight ends up `Failed`, never stuck in
//! `Submitting`.

use quickshop_core::{OrderId, SubmissionStatus};
use tokio::sync::watch;
use tracing::{info, instrument, warn};

use super::{OrderSnapshot, OrderStore, OrderTotals};
use crate::cart::CartStore;
use crate::checkout::ContactInfo;
use crate::config::TotalsPolicy;
use crate::error::{AppError, add_breadcrumb};
use crate::services::{Notifier, OrderNotification};

/// Message shown once an order has been placed.
pub const ORDER_PLACED: &str = "Order placed successfully!";

/// Where the presentation layer should go next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// The catalog home page.
    Home,
    /// The confirmation page for a just-placed order.
    Confirmation { order_id: OrderId },
}

/// One checkout attempt and its progress.
///
/// The status is published on a watch channel so a view can disable its
/// submit button while the order is in flight.
#[derive(Debug)]
pub struct OrderSubmission {
    status: watch::Sender<SubmissionStatus>,
}

impl Default for OrderSubmission {
    fn default() -> Self {
        Self {
            status: watch::channel(SubmissionStatus::Idle).0,
        }
    }
}

/// Marks the submission `Failed` if it is dropped while still `Submitting`.
struct InFlight<'a>(&'a watch::Sender<SubmissionStatus>);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.send_if_modified(|status| {
            if *status == SubmissionStatus::Submitting {
                warn!("Order submission abandoned mid-flight");
                *status = SubmissionStatus::Failed;
                true
            } else {
                false
            }
        });
    }
}

impl OrderSubmission {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn status(&self) -> SubmissionStatus {
        *self.status.borrow()
    }

    /// Follow status changes from elsewhere (e.g. a view).
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SubmissionStatus> {
        self.status.subscribe()
    }

    fn set_status(&self, status: SubmissionStatus) {
        self.status.send_replace(status);
    }

    /// Place the order for `contact` with the current contents of `cart`.
    ///
    /// The cart is merged first. If `notifier` is given it is awaited once;
    /// its failure, or a failure to write the snapshot, moves the submission
    /// to [`SubmissionStatus::Failed`] and leaves the cart intact. On success
    /// the snapshot is stored, the cart is emptied and the caller is told to
    /// navigate to the confirmation page.
    ///
    /// # Errors
    ///
    /// - [`AppError::AlreadySubmitted`] if this submission already succeeded
    /// - [`AppError::EmptyCart`] if there is nothing to order
    /// - [`AppError::Notification`] if the notifier fails
    /// - [`AppError::Storage`] if the snapshot cannot be written
    #[instrument(skip_all, fields(email = %contact.email))]
    pub async fn submit<S, N>(
        &mut self,
        contact: ContactInfo,
        cart: &mut CartStore,
        store: &S,
        notifier: Option<&N>,
        policy: TotalsPolicy,
    ) -> Result<Navigation, AppError>
    where
        S: OrderStore + ?Sized,
        N: Notifier,
    {
        if !self.status().can_submit() {
            return Err(AppError::AlreadySubmitted);
        }

        cart.merge();
        if cart.is_empty() {
            return Err(AppError::EmptyCart);
        }

        self.set_status(SubmissionStatus::Submitting);
        let _in_flight = InFlight(&self.status);

        let items = cart.items().to_vec();
        let totals = OrderTotals::compute(&items, policy);

        if let Some(notifier) = notifier {
            let notification = OrderNotification {
                contact: &contact,
                items: &items,
                total: totals.total,
            };
            if let Err(e) = notifier.send(notification).await {
                warn!(error = %e, "Order notification failed, keeping cart");
                self.set_status(SubmissionStatus::Failed);
                return Err(e.into());
            }
        }

        let snapshot = OrderSnapshot::capture(contact, items, totals);
        if let Err(e) = store.write(&snapshot) {
            self.set_status(SubmissionStatus::Failed);
            return Err(e.into());
        }

        cart.clear();
        self.set_status(SubmissionStatus::Succeeded);

        let order_id = snapshot.id.to_string();
        add_breadcrumb("checkout", "Placed order", Some(&[("order_id", order_id.as_str())]));
        info!(
            order_id = %snapshot.id,
            lines = snapshot.items.len(),
            total = %snapshot.totals.total,
            "Order placed"
        );

        Ok(Navigation::Confirmation {
            order_id: snapshot.id,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use quickshop_core::{Email, Phone, Price, Product, ProductId};

    use super::*;
    use crate::cart::CartLineItem;
    use crate::order::{MemoryOrderStore, StorageError};
    use crate::services::{EmailNotifier, NotifyError};

    /// Records every notification it is asked to send.
    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<(String, usize, Price)>>,
    }

    impl Notifier for RecordingNotifier {
        async fn send(&self, notification: OrderNotification<'_>) -> Result<(), NotifyError> {
            self.sent.lock().unwrap().push((
                notification.contact.email.to_string(),
                notification.items.len(),
                notification.total,
            ));
            Ok(())
        }
    }

    struct FailingNotifier;

    impl Notifier for FailingNotifier {
        async fn send(&self, _notification: OrderNotification<'_>) -> Result<(), NotifyError> {
            Err(NotifyError::Api {
                status: 503,
                message: "unavailable".to_string(),
            })
        }
    }

    /// Notes what the world looked like at the moment it was called.
    struct ObservingNotifier {
        store: Arc<MemoryOrderStore>,
        status: watch::Receiver<SubmissionStatus>,
        seen: Mutex<Option<(bool, SubmissionStatus)>>,
    }

    impl Notifier for ObservingNotifier {
        async fn send(&self, _notification: OrderNotification<'_>) -> Result<(), NotifyError> {
            let snapshot_written = self.store.read().unwrap().is_some();
            let status = *self.status.borrow();
            *self.seen.lock().unwrap() = Some((snapshot_written, status));
            Ok(())
        }
    }

    /// Never answers.
    struct HangingNotifier;

    impl Notifier for HangingNotifier {
        async fn send(&self, _notification: OrderNotification<'_>) -> Result<(), NotifyError> {
            std::future::pending().await
        }
    }

    /// A store whose disk is always full.
    struct FullDiskStore;

    impl OrderStore for FullDiskStore {
        fn write(&self, _snapshot: &OrderSnapshot) -> Result<(), StorageError> {
            Err(StorageError::Io {
                path: "orderSummary.json".into(),
                source: std::io::Error::other("no space left on device"),
            })
        }

        fn read(&self) -> Result<Option<OrderSnapshot>, StorageError> {
            Ok(None)
        }

        fn clear(&self) -> Result<(), StorageError> {
            Ok(())
        }
    }

    fn product(id: u64, cents: u32) -> Product {
        Product {
            id: ProductId::Numeric(id),
            title: format!("Product {id}"),
            price: Price::from_cents(cents),
            image: String::new(),
            description: String::new(),
            category: String::new(),
        }
    }

    fn contact() -> ContactInfo {
        ContactInfo {
            name: "Jane Doe".to_string(),
            email: Email::parse("jane@example.com").unwrap(),
            phone: Phone::parse("01012345678").unwrap(),
            address: "1 Main St".to_string(),
        }
    }

    fn cart_with(adds: &[(u64, u32)]) -> CartStore {
        let mut cart = CartStore::new();
        for &(id, cents) in adds {
            cart.add(product(id, cents));
        }
        cart
    }

    #[tokio::test]
    async fn test_submit_writes_snapshot_and_clears_cart() {
        let mut cart = cart_with(&[(7, 1000), (7, 1000), (9, 500)]);
        let store = MemoryOrderStore::new();
        let mut submission = OrderSubmission::new();

        let nav = submission
            .submit(
                contact(),
                &mut cart,
                &store,
                None::<&EmailNotifier>,
                TotalsPolicy::default(),
            )
            .await
            .unwrap();

        let snapshot = store.read().unwrap().unwrap();
        assert_eq!(nav, Navigation::Confirmation { order_id: snapshot.id });
        assert_eq!(submission.status(), SubmissionStatus::Succeeded);
        assert!(cart.is_empty());

        let lines: Vec<_> = snapshot
            .items
            .iter()
            .map(|l| (l.product.id.clone(), l.quantity))
            .collect();
        assert_eq!(
            lines,
            vec![(ProductId::Numeric(7), 2), (ProductId::Numeric(9), 1)]
        );
        assert_eq!(snapshot.totals.subtotal, Price::from_cents(2500));
        assert_eq!(snapshot.totals.total, Price::from_cents(3300));
        assert_eq!(snapshot.contact, contact());
    }

    #[tokio::test]
    async fn test_submit_merges_unmerged_cart() {
        let mut cart = CartStore::new();
        cart.replace_all(vec![
            CartLineItem::new(product(1, 100)),
            CartLineItem::new(product(2, 100)),
            CartLineItem::new(product(1, 100)),
        ]);
        let store = MemoryOrderStore::new();

        OrderSubmission::new()
            .submit(
                contact(),
                &mut cart,
                &store,
                None::<&EmailNotifier>,
                TotalsPolicy::default(),
            )
            .await
            .unwrap();

        let snapshot = store.read().unwrap().unwrap();
        assert_eq!(snapshot.items.len(), 2);
        assert_eq!(snapshot.items[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_notifier_receives_merged_items_and_total() {
        let mut cart = cart_with(&[(7, 1000), (7, 1000), (9, 500)]);
        let store = MemoryOrderStore::new();
        let notifier = RecordingNotifier::default();

        OrderSubmission::new()
            .submit(
                contact(),
                &mut cart,
                &store,
                Some(&notifier),
                TotalsPolicy::default(),
            )
            .await
            .unwrap();

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(
            *sent,
            vec![("jane@example.com".to_string(), 2, Price::from_cents(3300))]
        );
    }

    #[tokio::test]
    async fn test_notifier_failure_keeps_cart_and_skips_snapshot() {
        let mut cart = cart_with(&[(7, 1000), (9, 500)]);
        let before = cart.clone();
        let store = MemoryOrderStore::new();
        let mut submission = OrderSubmission::new();

        let err = submission
            .submit(
                contact(),
                &mut cart,
                &store,
                Some(&FailingNotifier),
                TotalsPolicy::default(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Notification(_)));
        assert_eq!(submission.status(), SubmissionStatus::Failed);
        assert_eq!(cart, before);
        assert!(store.read().unwrap().is_none());

        // The shopper can retry from the intact cart
        submission
            .submit(
                contact(),
                &mut cart,
                &store,
                None::<&EmailNotifier>,
                TotalsPolicy::default(),
            )
            .await
            .unwrap();
        assert_eq!(submission.status(), SubmissionStatus::Succeeded);
    }

    #[tokio::test]
    async fn test_storage_failure_keeps_cart() {
        let mut cart = cart_with(&[(7, 1000)]);
        let mut submission = OrderSubmission::new();

        let err = submission
            .submit(
                contact(),
                &mut cart,
                &FullDiskStore,
                None::<&EmailNotifier>,
                TotalsPolicy::default(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Storage(_)));
        assert_eq!(submission.status(), SubmissionStatus::Failed);
        assert_eq!(cart.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_cart_is_rejected() {
        let mut cart = CartStore::new();
        let store = MemoryOrderStore::new();
        let mut submission = OrderSubmission::new();

        let err = submission
            .submit(
                contact(),
                &mut cart,
                &store,
                None::<&EmailNotifier>,
                TotalsPolicy::default(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::EmptyCart));
        assert_eq!(submission.status(), SubmissionStatus::Idle);
        assert!(store.read().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_succeeded_submission_cannot_resubmit() {
        let mut cart = cart_with(&[(7, 1000)]);
        let store = MemoryOrderStore::new();
        let mut submission = OrderSubmission::new();

        submission
            .submit(
                contact(),
                &mut cart,
                &store,
                None::<&EmailNotifier>,
                TotalsPolicy::default(),
            )
            .await
            .unwrap();

        cart.add(product(9, 500));
        let err = submission
            .submit(
                contact(),
                &mut cart,
                &store,
                None::<&EmailNotifier>,
                TotalsPolicy::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AlreadySubmitted));
        assert_eq!(cart.len(), 1);
    }

    #[tokio::test]
    async fn test_notifier_awaited_before_snapshot_write() {
        let mut cart = cart_with(&[(7, 1000)]);
        let store = Arc::new(MemoryOrderStore::new());
        let mut submission = OrderSubmission::new();
        let notifier = ObservingNotifier {
            store: Arc::clone(&store),
            status: submission.subscribe(),
            seen: Mutex::new(None),
        };

        submission
            .submit(
                contact(),
                &mut cart,
                &*store,
                Some(&notifier),
                TotalsPolicy::default(),
            )
            .await
            .unwrap();

        // Called once, with no snapshot yet and the submission in flight
        assert_eq!(
            *notifier.seen.lock().unwrap(),
            Some((false, SubmissionStatus::Submitting))
        );
        assert!(store.read().unwrap().is_some());
        assert_eq!(*notifier.status.borrow(), SubmissionStatus::Succeeded);
    }

    #[tokio::test]
    async fn test_abandoned_submission_can_be_retried() {
        let mut cart = cart_with(&[(7, 1000), (9, 500)]);
        let before = cart.clone();
        let store = MemoryOrderStore::new();
        let mut submission = OrderSubmission::new();

        let outcome = tokio::time::timeout(
            Duration::from_millis(20),
            submission.submit(
                contact(),
                &mut cart,
                &store,
                Some(&HangingNotifier),
                TotalsPolicy::default(),
            ),
        )
        .await;

        assert!(outcome.is_err());
        assert_eq!(submission.status(), SubmissionStatus::Failed);
        assert_eq!(cart, before);
        assert!(store.read().unwrap().is_none());

        submission
            .submit(
                contact(),
                &mut cart,
                &store,
                None::<&EmailNotifier>,
                TotalsPolicy::default(),
            )
            .await
            .unwrap();
        assert_eq!(submission.status(), SubmissionStatus::Succeeded);
    }
}
