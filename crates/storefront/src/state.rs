//! Session state owned by the presentation layer.

use quickshop_core::{Product, ProductId};
use tracing::info;

use crate::cart::CartStore;
use crate::catalog::CatalogClient;
use crate::checkout::CheckoutFormState;
use crate::config::{StorefrontConfig, TotalsPolicy};
use crate::error::{AppError, Notice};
use crate::order::{
    Confirmation, FileOrderStore, Navigation, OrderStore, OrderSubmission, load_confirmation,
};
use crate::page::{LoadState, PageScope};
use crate::services::{EmailNotifier, Notifier};

/// One browsing session.
///
/// The session is the single owner of the cart: it starts empty when the
/// session is created and is gone when the session is dropped. Pages borrow
/// what they need from it for as long as they are shown.
pub struct Session<S, N> {
    cart: CartStore,
    catalog: CatalogClient,
    store: S,
    notifier: Option<N>,
    totals: TotalsPolicy,
}

/// Session wired to the real file store and email service.
pub type StorefrontSession = Session<FileOrderStore, EmailNotifier>;

impl StorefrontSession {
    /// Create a session from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog or notification clients cannot be
    /// built.
    pub fn from_config(config: &StorefrontConfig) -> Result<Self, AppError> {
        let catalog = CatalogClient::new(&config.catalog).map_err(AppError::Products)?;
        let store = FileOrderStore::new(&config.snapshot_path);
        let notifier = config
            .notify
            .as_ref()
            .map(EmailNotifier::new)
            .transpose()?;

        info!(
            catalog = %config.catalog.base_url,
            snapshot = %config.snapshot_path.display(),
            notifications = notifier.is_some(),
            "Session started"
        );

        Ok(Self::new(catalog, store, notifier, config.totals))
    }
}

impl<S: OrderStore, N: Notifier> Session<S, N> {
    /// Create a session with an empty cart.
    #[must_use]
    pub const fn new(
        catalog: CatalogClient,
        store: S,
        notifier: Option<N>,
        totals: TotalsPolicy,
    ) -> Self {
        Self {
            cart: CartStore::new(),
            catalog,
            store,
            notifier,
            totals,
        }
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub const fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    #[must_use]
    pub const fn catalog(&self) -> &CatalogClient {
        &self.catalog
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub const fn totals(&self) -> TotalsPolicy {
        self.totals
    }

    // =========================================================================
    // Pages
    // =========================================================================

    /// Load the product listing (all products, or the first `limit`).
    pub async fn load_products(
        &self,
        scope: &PageScope,
        state: &mut LoadState<Vec<Product>>,
        limit: Option<u32>,
    ) -> Option<Notice> {
        scope
            .load(state, async {
                self.catalog
                    .list_products(limit)
                    .await
                    .map_err(AppError::Products)
            })
            .await
    }

    /// Load the home page best sellers.
    pub async fn load_featured(
        &self,
        scope: &PageScope,
        state: &mut LoadState<Vec<Product>>,
    ) -> Option<Notice> {
        scope
            .load(state, async {
                self.catalog
                    .featured_products()
                    .await
                    .map_err(AppError::Products)
            })
            .await
    }

    /// Load a single product for its details page.
    pub async fn load_product(
        &self,
        scope: &PageScope,
        state: &mut LoadState<Product>,
        id: &ProductId,
    ) -> Option<Notice> {
        scope
            .load(state, async {
                self.catalog
                    .get_product(id)
                    .await
                    .map_err(AppError::ProductDetails)
            })
            .await
    }

    /// Fetch a product and put one unit of it in the cart.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ProductDetails`] if the product cannot be fetched;
    /// the cart is unchanged.
    pub async fn add_to_cart(&mut self, id: &ProductId) -> Result<(), AppError> {
        let product = self
            .catalog
            .get_product(id)
            .await
            .map_err(AppError::ProductDetails)?;
        self.cart.add(product);
        Ok(())
    }

    /// Validate the checkout form and place the order.
    ///
    /// An invalid form touches every field, blocks submission, and leaves
    /// `submission` and the cart untouched.
    ///
    /// # Errors
    ///
    /// [`AppError::Validation`] for a failing form, or any error from
    /// [`OrderSubmission::submit`].
    pub async fn place_order(
        &mut self,
        form: &mut CheckoutFormState,
        submission: &mut OrderSubmission,
    ) -> Result<Navigation, AppError> {
        let contact = form.submit().map_err(AppError::Validation)?;

        submission
            .submit(
                contact,
                &mut self.cart,
                &self.store,
                self.notifier.as_ref(),
                self.totals,
            )
            .await
    }

    /// Enter the confirmation page.
    #[must_use]
    pub fn confirmation(&self) -> Confirmation {
        load_confirmation(&self.store)
    }
}
