//! Carrier rate API client.

use std::time::Duration;

use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument, warn};

use crafteo_core::packaging::PackageDims;

use super::types::{CarrierRate, RateRequest, RateRequestDimensions, RateResponse};
use super::CarrierError;
use crate::config::CarrierConfig;

/// Quotes are cached this long per destination/parcel signature.
const QUOTE_CACHE_TTL: Duration = Duration::from_secs(600);
const QUOTE_CACHE_CAPACITY: u64 = 1_000;

/// HTTP client for the carrier rate API.
#[derive(Clone)]
pub struct CarrierClient {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<SecretString>,
    /// Per-request quote cache keyed by destination + parcel signature.
    cache: Cache<String, CarrierRate>,
}

impl std::fmt::Debug for CarrierClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CarrierClient")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl CarrierClient {
    /// Create a new carrier client.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created. This should never happen
    /// under normal circumstances as we use standard TLS configuration.
    #[must_use]
    pub fn new(config: &CarrierConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            cache: Cache::builder()
                .max_capacity(QUOTE_CACHE_CAPACITY)
                .time_to_live(QUOTE_CACHE_TTL)
                .build(),
        }
    }

    /// Quote the shipping cost for one parcel to a postal code.
    ///
    /// Answers are cached for ten minutes per destination and parcel
    /// signature, so repeated checkout steps reuse the same quote.
    ///
    /// # Errors
    ///
    /// Returns [`CarrierError`] when the request fails, the response cannot
    /// be parsed, the carrier reports an error, or no option carries a cost.
    #[instrument(skip(self), fields(postal_code = %postal_code))]
    pub async fn quote(
        &self,
        postal_code: &str,
        dims: PackageDims,
    ) -> Result<CarrierRate, CarrierError> {
        let key = cache_key(postal_code, dims);
        if let Some(cached) = self.cache.get(&key).await {
            debug!("carrier quote served from cache");
            return Ok(cached);
        }

        let rate = self.fetch_quote(postal_code, dims).await?;
        self.cache.insert(key, rate.clone()).await;
        Ok(rate)
    }

    async fn fetch_quote(
        &self,
        postal_code: &str,
        dims: PackageDims,
    ) -> Result<CarrierRate, CarrierError> {
        let body = RateRequest {
            destination_postal_code: postal_code.to_string(),
            dimensions: RateRequestDimensions::from(dims),
        };

        let mut request = self.client.post(&self.api_url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| CarrierError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "carrier rate API returned an error status");
            return Err(CarrierError::Api(format!("{status}: {body}")));
        }

        let parsed: RateResponse = response
            .json()
            .await
            .map_err(|e| CarrierError::Response(e.to_string()))?;

        if !parsed.success {
            return Err(CarrierError::Api(
                parsed.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        let estimated_delivery = parsed
            .selected_option
            .as_ref()
            .and_then(|o| o.estimated_delivery.clone())
            .or_else(|| {
                parsed
                    .options
                    .iter()
                    .find_map(|o| o.estimated_delivery.clone())
            });

        let cost = parsed
            .default_cost
            .or_else(|| parsed.options.iter().map(|o| o.cost).min())
            .ok_or(CarrierError::NoOptions)?;

        debug!(%cost, "carrier quote obtained");

        Ok(CarrierRate {
            cost,
            estimated_delivery,
        })
    }
}

/// Cache key: destination plus the parcel signature.
fn cache_key(postal_code: &str, dims: PackageDims) -> String {
    format!(
        "{postal_code}|{}x{}x{}|{}",
        dims.width_cm, dims.height_cm, dims.length_cm, dims.weight_g
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_cache_key_distinguishes_parcels() {
        let a = PackageDims {
            width_cm: Decimal::from(15),
            height_cm: Decimal::from(8),
            length_cm: Decimal::from(20),
            weight_g: Decimal::from(400),
        };
        let mut b = a;
        b.weight_g = Decimal::from(500);
        assert_ne!(cache_key("1406", a), cache_key("1406", b));
        assert_ne!(cache_key("1406", a), cache_key("1824", a));
        assert_eq!(cache_key("1406", a), cache_key("1406", a));
    }
}
