//! Integration tests for Crafteo.
//!
//! The scenario tests under `tests/` exercise the domain logic across
//! module boundaries (cart → pricing → shipping → totals, recipes →
//! draw planning) without a live database or network: everything the
//! checkout computes is a pure function of catalog and configuration
//! snapshots.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p crafteo-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use rust_decimal::Decimal;

use crafteo_core::product::Product;
use crafteo_core::shipping::{ShippingConfig, ShippingZone};
use crafteo_core::types::{ProductId, ShippingZoneId, Technology};

/// A minimal valid product; scenario tests override what they need.
#[must_use]
pub fn product(id: i32, price: i64) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Producto {id}"),
        category: "Hogar".to_string(),
        technology: Technology::ThreeD,
        price: Decimal::from(price),
        stock: None,
        width_cm: Decimal::from(10),
        height_cm: Decimal::from(5),
        length_cm: Decimal::from(10),
        weight_g: None,
        image_url: None,
        active: true,
        unit_enabled: true,
        pack_enabled: false,
        units_per_pack: None,
        pack_discount_pct: None,
        wholesale_enabled: false,
        wholesale_units: None,
        wholesale_discount_pct: None,
        recipe: None,
        model_options: Vec::new(),
        color_options: Vec::new(),
    }
}

/// Shop-shaped shipping configuration: moto free over 70k, correo free
/// over 40k, no fallback fee.
#[must_use]
pub fn shipping_config() -> ShippingConfig {
    ShippingConfig {
        moto_free_threshold: Decimal::from(70_000),
        moto_base_fee: Decimal::from(3500),
        mail_free_threshold: Decimal::from(40_000),
        mail_fallback_fee: None,
    }
}

/// A flat-priced zone over an inclusive postal-code range.
#[must_use]
pub fn zone(id: i32, name: &str, from: i32, to: i32, price: i64) -> ShippingZone {
    ShippingZone {
        id: ShippingZoneId::new(id),
        name: name.to_string(),
        cp_from: from,
        cp_to: to,
        price: Decimal::from(price),
        free_threshold: None,
        active: true,
    }
}
