//! Workflow webhook notifications.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, instrument};

use crafteo_core::order::Order;

/// Errors sending the order webhook.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The request could not be sent.
    #[error("webhook request failed: {0}")]
    Request(String),

    /// The receiver answered with a non-success status.
    #[error("webhook returned {0}")]
    Status(String),
}

/// Client for the new-order workflow webhook.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: reqwest::Client,
    url: String,
}

impl WebhookClient {
    /// Create a new webhook client.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created. This should never happen
    /// under normal circumstances as we use standard TLS configuration.
    #[must_use]
    pub fn new(url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            url: url.to_string(),
        }
    }

    /// POST the new-order event to the workflow webhook.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError`] if the request fails or the receiver
    /// answers with a non-success status.
    #[instrument(skip(self, order), fields(order_id = %order.id))]
    pub async fn send_order_created(&self, order: &Order) -> Result<(), WebhookError> {
        let payload = serde_json::json!({
            "event": "new_order",
            "order_id": order.id,
            "order_number": order.order_number,
            "customer_name": order.customer.name,
            "total": order.total,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| WebhookError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(WebhookError::Status(response.status().to_string()));
        }

        debug!("order webhook delivered");
        Ok(())
    }
}
