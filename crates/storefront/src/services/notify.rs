//! Order notification client.
//!
//! Sends a "Placed Order" event to an external email service, which mails the
//! shopper their order details. One attempt per submission; the caller decides
//! what a failure means.

use std::future::Future;

use quickshop_core::Price;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::cart::CartLineItem;
use crate::checkout::ContactInfo;
use crate::config::NotifyConfig;

/// Event name recorded by the email service.
const ORDER_EVENT: &str = "Placed Order";

/// Errors that can occur when sending an order notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Client could not be configured.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Everything the shopper is told about their order.
#[derive(Debug, Clone, Copy)]
pub struct OrderNotification<'a> {
    pub contact: &'a ContactInfo,
    pub items: &'a [CartLineItem],
    pub total: Price,
}

/// Delivers order notifications.
pub trait Notifier: Send + Sync {
    /// Send one notification. No retries.
    fn send(
        &self,
        notification: OrderNotification<'_>,
    ) -> impl Future<Output = Result<(), NotifyError>> + Send;
}

/// Email service client.
#[derive(Clone)]
pub struct EmailNotifier {
    client: reqwest::Client,
    endpoint: Url,
    from: String,
}

impl EmailNotifier {
    /// Create a new email service client.
    ///
    /// # Errors
    ///
    /// Returns error if the API key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &NotifyConfig) -> Result<Self, NotifyError> {
        let mut headers = HeaderMap::new();

        headers.insert(
            "Authorization",
            bearer_header(&config.api_key)?,
        );
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            from: config.from.clone(),
        })
    }
}

fn bearer_header(api_key: &SecretString) -> Result<HeaderValue, NotifyError> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret()))
        .map_err(|e| NotifyError::Config(format!("Invalid API key format: {e}")))?;
    value.set_sensitive(true);
    Ok(value)
}

impl Notifier for EmailNotifier {
    #[instrument(skip(self, notification), fields(email = %notification.contact.email))]
    async fn send(&self, notification: OrderNotification<'_>) -> Result<(), NotifyError> {
        let event = OrderEvent::new(ORDER_EVENT, &self.from, notification);

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&event)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(NotifyError::Api {
                status: status.as_u16(),
                message,
            });
        }

        tracing::info!("Order notification sent");
        Ok(())
    }
}

/// Wire shape of an order event.
#[derive(Debug, Serialize)]
struct OrderEvent<'a> {
    event: &'a str,
    from: &'a str,
    to: &'a str,
    properties: OrderEventProperties<'a>,
}

#[derive(Debug, Serialize)]
struct OrderEventProperties<'a> {
    customer_name: &'a str,
    phone: &'a str,
    address: &'a str,
    items: Vec<OrderEventItem<'a>>,
    total: String,
}

#[derive(Debug, Serialize)]
struct OrderEventItem<'a> {
    product_id: String,
    title: &'a str,
    quantity: u32,
    unit_price: String,
    line_total: String,
}

impl<'a> OrderEvent<'a> {
    fn new(event: &'a str, from: &'a str, notification: OrderNotification<'a>) -> Self {
        let contact = notification.contact;
        Self {
            event,
            from,
            to: contact.email.as_str(),
            properties: OrderEventProperties {
                customer_name: &contact.name,
                phone: contact.phone.as_str(),
                address: &contact.address,
                items: notification
                    .items
                    .iter()
                    .map(|line| OrderEventItem {
                        product_id: line.product.id.to_string(),
                        title: &line.product.title,
                        quantity: line.quantity,
                        unit_price: line.product.price.to_string(),
                        line_total: line.line_total().to_string(),
                    })
                    .collect(),
                total: notification.total.to_string(),
            },
        }
    }
}
