//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use crafteo_core::product::Product;

use crate::carrier::CarrierClient;
use crate::config::StorefrontConfig;
use crate::payments::PaymentClient;
use crate::services::email::EmailService;
use crate::services::notify::WebhookClient;

/// Catalog responses are cached this long.
const CATALOG_CACHE_TTL: Duration = Duration::from_secs(60);

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; every collaborator (pool, HTTP clients) is
/// constructed once at startup and injected here - no lazily initialized
/// globals.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    carrier: CarrierClient,
    payments: PaymentClient,
    webhook: Option<WebhookClient>,
    email: Option<EmailService>,
    catalog_cache: Cache<&'static str, Arc<Vec<Product>>>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the SMTP transport cannot be built from the
    /// configured email settings.
    pub fn new(
        config: StorefrontConfig,
        pool: PgPool,
    ) -> Result<Self, lettre::transport::smtp::Error> {
        let carrier = CarrierClient::new(&config.carrier);
        let payments = PaymentClient::new(&config.payments);
        let webhook = config
            .order_webhook_url
            .as_deref()
            .map(WebhookClient::new);
        let email = config
            .email
            .as_ref()
            .map(EmailService::new)
            .transpose()?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                carrier,
                payments,
                webhook,
                email,
                catalog_cache: Cache::builder()
                    .max_capacity(8)
                    .time_to_live(CATALOG_CACHE_TTL)
                    .build(),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the carrier rate client.
    #[must_use]
    pub fn carrier(&self) -> &CarrierClient {
        &self.inner.carrier
    }

    /// Get a reference to the payment gateway client.
    #[must_use]
    pub fn payments(&self) -> &PaymentClient {
        &self.inner.payments
    }

    /// Get a reference to the order webhook client, if configured.
    #[must_use]
    pub fn webhook(&self) -> Option<&WebhookClient> {
        self.inner.webhook.as_ref()
    }

    /// Get a reference to the email service, if configured.
    #[must_use]
    pub fn email(&self) -> Option<&EmailService> {
        self.inner.email.as_ref()
    }

    /// Get a reference to the short-lived catalog cache.
    #[must_use]
    pub fn catalog_cache(&self) -> &Cache<&'static str, Arc<Vec<Product>>> {
        &self.inner.catalog_cache
    }
}
