//! Payment gateway client.

use std::time::Duration;

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use tracing::{debug, instrument};

use crafteo_core::order::Order;

use super::types::{
    BackUrls, PaymentPreference, PreferencePayer, PreferenceRequest, PreferenceResponse,
    PreferenceItem,
};
use super::PaymentError;
use crate::config::PaymentConfig;

/// HTTP client for the payment gateway.
#[derive(Clone)]
pub struct PaymentClient {
    client: reqwest::Client,
    api_url: String,
    access_token: SecretString,
    webhook_secret: Option<SecretString>,
}

impl std::fmt::Debug for PaymentClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentClient")
            .field("api_url", &self.api_url)
            .field("access_token", &"[REDACTED]")
            .field(
                "webhook_secret",
                &self.webhook_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .finish_non_exhaustive()
    }
}

impl PaymentClient {
    /// Create a new payment client.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created. This should never happen
    /// under normal circumstances as we use standard TLS configuration.
    #[must_use]
    pub fn new(config: &PaymentConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_url: config.api_url.clone(),
            access_token: config.access_token.clone(),
            webhook_secret: config.webhook_secret.clone(),
        }
    }

    /// Create a checkout preference for an order.
    ///
    /// Items carry the order's snapshot prices plus the shipping cost as a
    /// separate line when it is not free.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError`] if the request fails, the gateway answers
    /// with an error status, or the response cannot be parsed.
    #[instrument(skip(self, order, base_url), fields(order_id = %order.id))]
    pub async fn create_preference(
        &self,
        order: &Order,
        base_url: &str,
    ) -> Result<PaymentPreference, PaymentError> {
        let mut items: Vec<PreferenceItem> = order
            .items
            .iter()
            .map(|item| PreferenceItem {
                title: item.name.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                currency_id: "ARS".to_string(),
            })
            .collect();
        if order.shipping_cost > rust_decimal::Decimal::ZERO {
            items.push(PreferenceItem {
                title: "Envío".to_string(),
                quantity: 1,
                unit_price: order.shipping_cost,
                currency_id: "ARS".to_string(),
            });
        }

        let body = PreferenceRequest {
            items,
            payer: PreferencePayer {
                email: order.customer.email.clone(),
            },
            back_urls: BackUrls {
                success: format!("{base_url}/checkout/success"),
                failure: format!("{base_url}/checkout/failure"),
                pending: format!("{base_url}/checkout/pending"),
            },
            external_reference: order.id.to_string(),
            auto_return: "approved".to_string(),
        };

        let response = self
            .client
            .post(format!("{}/checkout/preferences", self.api_url))
            .bearer_auth(self.access_token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| PaymentError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError::Api(format!("{status}: {body}")));
        }

        let parsed: PreferenceResponse = response
            .json()
            .await
            .map_err(|e| PaymentError::Response(e.to_string()))?;

        debug!(preference_id = %parsed.id, "payment preference created");

        Ok(PaymentPreference {
            id: parsed.id,
            redirect_url: parsed.init_point,
        })
    }

    /// Verify a callback signature, when a webhook secret is configured.
    ///
    /// The gateway signs `v0:{timestamp}:{payload}` with HMAC-SHA256 and
    /// sends `v0={hex}`. Without a configured secret this is a no-op (the
    /// callback carries no secret material; the order state is re-read from
    /// our own store either way).
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::InvalidSignature`] on a stale timestamp or a
    /// signature mismatch.
    #[instrument(skip(self, payload, signature))]
    pub fn verify_callback(
        &self,
        timestamp: &str,
        payload: &str,
        signature: &str,
    ) -> Result<(), PaymentError> {
        let Some(secret) = &self.webhook_secret else {
            return Ok(());
        };

        // Reject replays older than 5 minutes.
        let ts: i64 = timestamp
            .parse()
            .map_err(|_| PaymentError::InvalidSignature("invalid timestamp".to_string()))?;
        let now_secs = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_err(|e| PaymentError::InvalidSignature(e.to_string()))?
            .as_secs();
        let now = i64::try_from(now_secs)
            .map_err(|_| PaymentError::InvalidSignature("system time overflow".to_string()))?;
        if (now - ts).abs() > 300 {
            return Err(PaymentError::InvalidSignature(
                "timestamp too old".to_string(),
            ));
        }

        let basestring = format!("v0:{timestamp}:{payload}");
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.expose_secret().as_bytes())
            .map_err(|e| PaymentError::InvalidSignature(e.to_string()))?;
        mac.update(basestring.as_bytes());
        let expected = format!("v0={}", hex::encode(mac.finalize().into_bytes()));

        if !constant_time_compare(&expected, signature) {
            return Err(PaymentError::InvalidSignature(
                "signature mismatch".to_string(),
            ));
        }

        debug!("payment callback signature verified");
        Ok(())
    }
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(secret: Option<&str>) -> PaymentClient {
        PaymentClient::new(&PaymentConfig {
            api_url: "https://api.mercadopago.com".to_string(),
            access_token: SecretString::from("APP_USR-token-for-tests"),
            webhook_secret: secret.map(SecretString::from),
        })
    }

    fn sign(secret: &str, timestamp: &str, payload: &str) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("valid key length");
        mac.update(format!("v0:{timestamp}:{payload}").as_bytes());
        format!("v0={}", hex::encode(mac.finalize().into_bytes()))
    }

    fn now_timestamp() -> String {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("system time after epoch")
            .as_secs()
            .to_string()
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc", "abc"));
        assert!(!constant_time_compare("abc", "abd"));
        assert!(!constant_time_compare("abc", "abcd"));
    }

    #[test]
    fn test_verify_callback_valid_signature() {
        let client = client(Some("callback-signing-secret"));
        let ts = now_timestamp();
        let payload = "order_id=12&payment_id=99&status=approved";
        let signature = sign("callback-signing-secret", &ts, payload);
        assert!(client.verify_callback(&ts, payload, &signature).is_ok());
    }

    #[test]
    fn test_verify_callback_tampered_payload() {
        let client = client(Some("callback-signing-secret"));
        let ts = now_timestamp();
        let signature = sign("callback-signing-secret", &ts, "order_id=12&status=approved");
        let result = client.verify_callback(&ts, "order_id=12&status=rejected", &signature);
        assert!(matches!(result, Err(PaymentError::InvalidSignature(_))));
    }

    #[test]
    fn test_verify_callback_old_timestamp() {
        let client = client(Some("callback-signing-secret"));
        let old_ts = (std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("system time after epoch")
            .as_secs()
            - 600)
            .to_string();
        let payload = "order_id=12";
        let signature = sign("callback-signing-secret", &old_ts, payload);
        let result = client.verify_callback(&old_ts, payload, &signature);
        assert!(matches!(result, Err(PaymentError::InvalidSignature(_))));
    }

    #[test]
    fn test_verify_callback_without_secret_is_noop() {
        let client = client(None);
        assert!(client.verify_callback("0", "anything", "v0=junk").is_ok());
    }
}
