//! Shipping configuration inputs.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Input for updating the shipping config singleton.
#[derive(Debug, Deserialize)]
pub struct ShippingConfigInput {
    pub moto_free_threshold: Decimal,
    pub moto_base_fee: Decimal,
    pub mail_free_threshold: Decimal,
    #[serde(default)]
    pub mail_fallback_fee: Option<Decimal>,
}

/// Input for creating or replacing a shipping zone.
#[derive(Debug, Deserialize)]
pub struct ShippingZoneInput {
    pub name: String,
    pub cp_from: i32,
    pub cp_to: i32,
    pub price: Decimal,
    #[serde(default)]
    pub free_threshold: Option<Decimal>,
    #[serde(default = "default_true")]
    pub active: bool,
}

const fn default_true() -> bool {
    true
}
