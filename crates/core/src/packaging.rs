//! Single-parcel dimension and weight aggregation.
//!
//! The carrier quotes one package per order, so the cart has to collapse
//! into a single shippable box: widest item sets the width, items stack up
//! to three high, lengths beyond the longest item compress into the box,
//! and undeclared weights are estimated from the manufacturing technology.

use rust_decimal::Decimal;

use crate::product::Product;
use crate::types::Technology;

/// Items stack at most this high inside the box.
const STACK_CAP: i32 = 3;
/// Every unit past the longest one contributes this fraction of its length.
const LENGTH_COMPRESSION: Decimal = Decimal::from_parts(3, 0, 0, false, 1); // 0.3

// Fixed packaging margins.
const MARGIN_WIDTH_CM: Decimal = Decimal::from_parts(5, 0, 0, false, 0);
const MARGIN_HEIGHT_CM: Decimal = Decimal::from_parts(3, 0, 0, false, 0);
const MARGIN_LENGTH_CM: Decimal = Decimal::from_parts(10, 0, 0, false, 0);
const MARGIN_WEIGHT_G: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

// Carrier maxima and minimum billable weight.
const MAX_WIDTH_CM: Decimal = Decimal::from_parts(40, 0, 0, false, 0);
const MAX_HEIGHT_CM: Decimal = Decimal::from_parts(30, 0, 0, false, 0);
const MAX_LENGTH_CM: Decimal = Decimal::from_parts(50, 0, 0, false, 0);
const MIN_WEIGHT_G: Decimal = Decimal::from_parts(300, 0, 0, false, 0);

// Weight estimation for 3D prints: bounding box × infill × PLA density.
const INFILL_FACTOR: Decimal = Decimal::from_parts(25, 0, 0, false, 2); // 0.25
const PLA_DENSITY_G_CM3: Decimal = Decimal::from_parts(124, 0, 0, false, 2); // 1.24
const MIN_PRINT_WEIGHT_G: Decimal = Decimal::from_parts(30, 0, 0, false, 0);

// Weight estimation for laser cuts: area × sheet thickness × wood density.
const DEFAULT_SHEET_THICKNESS_MM: Decimal = Decimal::from_parts(3, 0, 0, false, 0);
const WOOD_DENSITY_G_CM3: Decimal = Decimal::from_parts(7, 0, 0, false, 1); // 0.7
const MIN_CUT_WEIGHT_G: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Dimensions and weight of the aggregated parcel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct PackageDims {
    pub width_cm: Decimal,
    pub height_cm: Decimal,
    pub length_cm: Decimal,
    pub weight_g: Decimal,
}

/// Weight of one unit, declared or estimated from the technology.
///
/// 3D prints: bounding-box volume × 0.25 infill × 1.24 g/cm³ PLA, floor
/// 30 g. Laser cuts: footprint area × sheet thickness (3 mm default, the
/// declared height when it is at least that) × 0.7 g/cm³, floor 50 g.
#[must_use]
pub fn estimate_unit_weight_g(product: &Product) -> Decimal {
    if let Some(declared) = product.weight_g {
        return declared;
    }
    match product.technology {
        Technology::ThreeD => {
            let volume = product.width_cm * product.height_cm * product.length_cm;
            (volume * INFILL_FACTOR * PLA_DENSITY_G_CM3).max(MIN_PRINT_WEIGHT_G)
        }
        Technology::Laser => {
            let declared_mm = product.height_cm * Decimal::from(10);
            let thickness_mm = if declared_mm >= DEFAULT_SHEET_THICKNESS_MM {
                declared_mm
            } else {
                DEFAULT_SHEET_THICKNESS_MM
            };
            let volume = product.width_cm * product.length_cm * (thickness_mm / Decimal::from(10));
            (volume * WOOD_DENSITY_G_CM3).max(MIN_CUT_WEIGHT_G)
        }
    }
}

/// Collapse `(product, quantity)` lines into a single parcel.
///
/// Width is the widest item. Height stacks each item up to three units
/// high and takes the tallest stack. The longest unit travels at full
/// length; every other unit adds 0.3× its length. Weights sum per unit.
/// Packaging margins (+5/+3/+10 cm, +100 g) are added, then each dimension
/// is clamped to the carrier maxima (40×30×50 cm) and the weight floored
/// at 300 g.
#[must_use]
pub fn aggregate_package<'a, I>(items: I) -> PackageDims
where
    I: IntoIterator<Item = (&'a Product, i32)>,
{
    let mut width = Decimal::ZERO;
    let mut height = Decimal::ZERO;
    let mut longest = Decimal::ZERO;
    let mut total_length = Decimal::ZERO;
    let mut weight = Decimal::ZERO;

    for (product, quantity) in items {
        let qty = Decimal::from(quantity.max(0));
        width = width.max(product.width_cm);

        let stack = Decimal::from(quantity.clamp(0, STACK_CAP));
        height = height.max(product.height_cm * stack);

        longest = longest.max(product.length_cm);
        total_length += product.length_cm * qty;

        weight += estimate_unit_weight_g(product) * qty;
    }

    // One unit at full length; the rest compress into the box.
    let length = longest + (total_length - longest).max(Decimal::ZERO) * LENGTH_COMPRESSION;

    PackageDims {
        width_cm: (width + MARGIN_WIDTH_CM).min(MAX_WIDTH_CM),
        height_cm: (height + MARGIN_HEIGHT_CM).min(MAX_HEIGHT_CM),
        length_cm: (length + MARGIN_LENGTH_CM).min(MAX_LENGTH_CM),
        weight_g: (weight + MARGIN_WEIGHT_G).max(MIN_WEIGHT_G),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::test_fixtures::product;

    fn sized(id: i32, w: i64, h: i64, l: i64) -> Product {
        let mut p = product(id, 1000);
        p.width_cm = Decimal::from(w);
        p.height_cm = Decimal::from(h);
        p.length_cm = Decimal::from(l);
        p
    }

    #[test]
    fn test_height_caps_at_three_stacked_units() {
        let p = sized(1, 10, 4, 10);
        let dims = aggregate_package([(&p, 5)]);
        // 4 * 3 + 3 margin = 15, regardless of the extra two units.
        assert_eq!(dims.height_cm, Decimal::from(15));
    }

    #[test]
    fn test_width_never_below_largest_item() {
        let a = sized(1, 12, 4, 10);
        let b = sized(2, 20, 4, 10);
        let dims = aggregate_package([(&a, 3), (&b, 1)]);
        assert!(dims.width_cm >= Decimal::from(20));
        assert_eq!(dims.width_cm, Decimal::from(25)); // 20 + 5 margin
    }

    #[test]
    fn test_single_unit_length_is_full_plus_margin() {
        let p = sized(1, 10, 4, 18);
        let dims = aggregate_package([(&p, 1)]);
        assert_eq!(dims.length_cm, Decimal::from(28)); // 18 + 10 margin
    }

    #[test]
    fn test_additional_units_compress_lengthwise() {
        let p = sized(1, 10, 4, 10);
        let dims = aggregate_package([(&p, 3)]);
        // 10 + (20 * 0.3) + 10 margin = 26
        assert_eq!(dims.length_cm, Decimal::from(26));
    }

    #[test]
    fn test_dimensions_clamp_to_carrier_maxima() {
        let p = sized(1, 60, 45, 80);
        let dims = aggregate_package([(&p, 4)]);
        assert_eq!(dims.width_cm, Decimal::from(40));
        assert_eq!(dims.height_cm, Decimal::from(30));
        assert_eq!(dims.length_cm, Decimal::from(50));
    }

    #[test]
    fn test_weight_floor_applies() {
        let mut p = sized(1, 5, 2, 5);
        p.weight_g = Some(Decimal::from(40));
        let dims = aggregate_package([(&p, 1)]);
        // 40 + 100 margin = 140, floored to 300.
        assert_eq!(dims.weight_g, Decimal::from(300));
    }

    #[test]
    fn test_declared_weight_sums_per_unit() {
        let mut p = sized(1, 10, 4, 10);
        p.weight_g = Some(Decimal::from(250));
        let dims = aggregate_package([(&p, 2)]);
        assert_eq!(dims.weight_g, Decimal::from(600)); // 500 + 100 margin
    }

    #[test]
    fn test_estimate_3d_print_weight() {
        // 10 × 5 × 10 cm = 500 cm³ × 0.25 × 1.24 = 155 g
        let p = sized(1, 10, 5, 10);
        assert_eq!(estimate_unit_weight_g(&p), Decimal::from(155));
    }

    #[test]
    fn test_estimate_3d_print_weight_floor() {
        let p = sized(1, 2, 1, 2); // 4 cm³ -> 1.24 g, floored to 30
        assert_eq!(estimate_unit_weight_g(&p), Decimal::from(30));
    }

    #[test]
    fn test_estimate_laser_cut_default_thickness() {
        let mut p = sized(1, 20, 0, 30);
        p.technology = Technology::Laser;
        // 20 × 30 × 0.3 cm × 0.7 = 126 g
        assert_eq!(estimate_unit_weight_g(&p), Decimal::from(126));
    }

    #[test]
    fn test_estimate_laser_cut_uses_declared_height_as_thickness() {
        let mut p = sized(1, 20, 1, 30); // 1 cm = 10 mm ≥ 3 mm
        p.technology = Technology::Laser;
        // 20 × 30 × 1 cm × 0.7 = 420 g
        assert_eq!(estimate_unit_weight_g(&p), Decimal::from(420));
    }

    #[test]
    fn test_estimate_laser_cut_weight_floor() {
        let mut p = sized(1, 3, 0, 3);
        p.technology = Technology::Laser;
        assert_eq!(estimate_unit_weight_g(&p), Decimal::from(50));
    }
}
