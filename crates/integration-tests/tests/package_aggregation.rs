//! Parcel aggregation scenarios for carrier quoting.

use rust_decimal::Decimal;

use crafteo_core::packaging::{aggregate_package, estimate_unit_weight_g};
use crafteo_core::types::Technology;

use crafteo_integration_tests::product;

#[test]
fn test_height_caps_at_three_stacked_units() {
    let mut p = product(1, 1000);
    p.height_cm = Decimal::from(4);
    // Five units, but stacking stops at three: 4 × 3 + 3 margin.
    let dims = aggregate_package([(&p, 5)]);
    assert_eq!(dims.height_cm, Decimal::from(15));
}

#[test]
fn test_width_follows_the_widest_item() {
    let mut narrow = product(1, 1000);
    narrow.width_cm = Decimal::from(8);
    let mut wide = product(2, 1000);
    wide.width_cm = Decimal::from(22);

    let dims = aggregate_package([(&narrow, 4), (&wide, 1)]);
    assert!(dims.width_cm >= Decimal::from(22));
    assert_eq!(dims.width_cm, Decimal::from(27)); // 22 + 5 margin
}

#[test]
fn test_mixed_cart_respects_carrier_maxima() {
    let mut big = product(1, 1000);
    big.width_cm = Decimal::from(55);
    big.height_cm = Decimal::from(40);
    big.length_cm = Decimal::from(70);
    big.weight_g = Some(Decimal::from(2500));

    let dims = aggregate_package([(&big, 3)]);
    assert_eq!(dims.width_cm, Decimal::from(40));
    assert_eq!(dims.height_cm, Decimal::from(30));
    assert_eq!(dims.length_cm, Decimal::from(50));
    // Weight is not capped, only floored: 7500 + 100 margin.
    assert_eq!(dims.weight_g, Decimal::from(7600));
}

#[test]
fn test_minimum_billable_weight() {
    let mut tiny = product(1, 1000);
    tiny.weight_g = Some(Decimal::from(20));
    let dims = aggregate_package([(&tiny, 1)]);
    assert_eq!(dims.weight_g, Decimal::from(300));
}

#[test]
fn test_estimated_weights_by_technology() {
    // 3D: 10 × 5 × 10 = 500 cm³ × 0.25 × 1.24 = 155 g.
    let printed = product(1, 1000);
    assert_eq!(estimate_unit_weight_g(&printed), Decimal::from(155));

    // Laser on the default 3 mm sheet: 20 × 30 × 0.3 × 0.7 = 126 g.
    let mut cut = product(2, 1000);
    cut.technology = Technology::Laser;
    cut.width_cm = Decimal::from(20);
    cut.height_cm = Decimal::ZERO;
    cut.length_cm = Decimal::from(30);
    assert_eq!(estimate_unit_weight_g(&cut), Decimal::from(126));
}

#[test]
fn test_declared_weight_beats_estimation() {
    let mut p = product(1, 1000);
    p.weight_g = Some(Decimal::from(999));
    assert_eq!(estimate_unit_weight_g(&p), Decimal::from(999));
}
