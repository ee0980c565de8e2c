//! Wire types for the payment gateway.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One line of a checkout preference.
#[derive(Debug, Clone, Serialize)]
pub struct PreferenceItem {
    pub title: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub currency_id: String,
}

/// Preference creation request body.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct PreferenceRequest {
    pub items: Vec<PreferenceItem>,
    pub payer: PreferencePayer,
    pub back_urls: BackUrls,
    /// Our order id, echoed back by the callback.
    pub external_reference: String,
    pub auto_return: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct PreferencePayer {
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct BackUrls {
    pub success: String,
    pub failure: String,
    pub pending: String,
}

/// Preference creation response body.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PreferenceResponse {
    pub id: String,
    pub init_point: String,
}

/// A created payment preference.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentPreference {
    /// Gateway preference id.
    pub id: String,
    /// Where to send the customer's browser.
    pub redirect_url: String,
}
