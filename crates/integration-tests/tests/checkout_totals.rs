//! End-to-end checkout totals: cart → pricing → shipping → total.
//!
//! These scenarios walk the same path the storefront checkout walks,
//! using the pure calculators with an in-memory catalog and shipping
//! configuration.

use rust_decimal::Decimal;

use crafteo_core::cart::Cart;
use crafteo_core::shipping::{ShippingError, mail_cost, moto_cost, shipping_cost};
use crafteo_core::types::{SaleType, ShippingMethod};

use crafteo_integration_tests::{product, shipping_config, zone};

/// 2× A ($15.000) + 1× B ($28.500) under moto shipping in a $2.000 zone.
#[test]
fn test_moto_checkout_total_with_zone_price() {
    let a = product(1, 15_000);
    let b = product(2, 28_500);

    let mut cart = Cart::default();
    cart.add(a, 2, SaleType::Unit, None, None).expect("adds");
    cart.add(b, 1, SaleType::Unit, None, None).expect("adds");

    let subtotal = cart.subtotal();
    assert_eq!(subtotal, Decimal::from(58_500));

    let config = shipping_config();
    let zones = [zone(1, "Zona 1", 1400, 1499, 2000)];

    // Below the 70k moto threshold, postal code inside the zone.
    let shipping = moto_cost(subtotal, Some("1406"), &config, &zones);
    assert_eq!(shipping, Decimal::from(2000));
    assert_eq!(subtotal + shipping, Decimal::from(60_500));
}

/// Same cart under correo: the 40k free-shipping threshold wins even when
/// the carrier quoted a positive rate.
#[test]
fn test_correo_free_shipping_overrides_positive_quote() {
    let a = product(1, 15_000);
    let b = product(2, 28_500);

    let mut cart = Cart::default();
    cart.add(a, 2, SaleType::Unit, None, None).expect("adds");
    cart.add(b, 1, SaleType::Unit, None, None).expect("adds");

    let subtotal = cart.subtotal();
    assert!(subtotal >= Decimal::from(40_000));

    let config = shipping_config();
    let shipping =
        mail_cost(subtotal, &config, Some(Decimal::from(8000))).expect("threshold met");
    assert_eq!(shipping, Decimal::ZERO);
    assert_eq!(subtotal + shipping, Decimal::from(58_500));
}

/// A small correo order with no quote and no fallback blocks checkout.
#[test]
fn test_correo_without_quote_blocks_checkout() {
    let config = shipping_config();
    let result = shipping_cost(
        ShippingMethod::Correo,
        Decimal::from(10_000),
        Some("1406"),
        &config,
        &[],
        None,
    );
    assert_eq!(result, Err(ShippingError::CarrierQuoteUnavailable));
}

/// Pickup is always free, whatever the cart holds.
#[test]
fn test_pickup_is_free() {
    let config = shipping_config();
    let cost = shipping_cost(
        ShippingMethod::Retiro,
        Decimal::from(500),
        None,
        &config,
        &[],
        None,
    )
    .expect("pickup never fails");
    assert_eq!(cost, Decimal::ZERO);
}

/// Pack lines price at the pack price and count packs, not units.
#[test]
fn test_pack_line_totals_flow_into_subtotal() {
    let mut p = product(1, 1500);
    p.pack_enabled = true;
    p.units_per_pack = Some(6);
    p.pack_discount_pct = Some(Decimal::from(10));

    let mut cart = Cart::default();
    cart.add(p, 2, SaleType::Pack, None, None).expect("adds");

    // pack = round(1500 × 6 × 0.9) = 8100; two packs.
    assert_eq!(cart.subtotal(), Decimal::from(16_200));
}

/// The stock guard holds across the add / re-add flow.
#[test]
fn test_stock_guard_blocks_overselling_in_cart() {
    let mut p = product(1, 1500);
    p.stock = Some(3);

    let mut cart = Cart::default();
    cart.add(p.clone(), 3, SaleType::Unit, None, None)
        .expect("within stock");
    assert!(cart.add(p, 1, SaleType::Unit, None, None).is_err());
    assert_eq!(cart.items.first().map(|i| i.quantity), Some(3));
}

/// Catalog changes clamp the cart: the subtotal follows the new state.
#[test]
fn test_catalog_clamp_flows_into_totals() {
    let mut cart = Cart::default();
    cart.add(product(1, 15_000), 4, SaleType::Unit, None, None)
        .expect("adds");

    let mut current = product(1, 15_000);
    current.stock = Some(2);
    cart.clamp_to_catalog(std::slice::from_ref(&current));

    assert_eq!(cart.subtotal(), Decimal::from(30_000));
}
