//! Sale-type price derivation.
//!
//! A product can be sold per unit, per pack, or wholesale ("mayorista").
//! Each enabled mode derives its price from the base unit price and the
//! product's discount configuration. The functions here are pure: calling
//! them twice with the same product yields the same prices.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::product::Product;
use crate::types::{SaleType, round_to_peso};

/// Defaults applied when a sale-type field is unset.
const DEFAULT_UNITS_PER_PACK: i32 = 1;
const DEFAULT_WHOLESALE_UNITS: i32 = 20;
const DEFAULT_WHOLESALE_DISCOUNT_PCT: i64 = 20;

/// One purchasable mode of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceOption {
    pub sale_type: SaleType,
    /// Units delivered per purchased count of this option.
    pub unit_count: i32,
    /// Price for one count of this option, whole pesos for derived modes.
    pub price: Decimal,
}

/// Price for a single unit. Always the base price.
#[must_use]
pub const fn unit_price(product: &Product) -> Decimal {
    product.price
}

/// Price for one pack, if packs are enabled.
///
/// `round(price × units_per_pack × (1 − pack_discount/100))`, with
/// `units_per_pack` defaulting to 1 and the discount to 0.
#[must_use]
pub fn pack_price(product: &Product) -> Option<Decimal> {
    if !product.pack_enabled {
        return None;
    }
    let units = product.units_per_pack.unwrap_or(DEFAULT_UNITS_PER_PACK);
    let discount = product.pack_discount_pct.unwrap_or(Decimal::ZERO);
    Some(discounted_total(product.price, units, discount))
}

/// Price for one wholesale lot, if wholesale is enabled.
///
/// `round(price × wholesale_units × (1 − wholesale_discount/100))`, with
/// the units defaulting to 20 and the discount to 20.
#[must_use]
pub fn wholesale_price(product: &Product) -> Option<Decimal> {
    if !product.wholesale_enabled {
        return None;
    }
    let units = product.wholesale_units.unwrap_or(DEFAULT_WHOLESALE_UNITS);
    let discount = product
        .wholesale_discount_pct
        .unwrap_or_else(|| Decimal::from(DEFAULT_WHOLESALE_DISCOUNT_PCT));
    Some(discounted_total(product.price, units, discount))
}

fn discounted_total(price: Decimal, units: i32, discount_pct: Decimal) -> Decimal {
    let factor = Decimal::ONE - discount_pct / Decimal::ONE_HUNDRED;
    round_to_peso(price * Decimal::from(units) * factor)
}

/// All enabled sale types with their prices, in fixed preference order:
/// unit, pack, wholesale. The first entry is the storefront default.
///
/// Unit sales are enabled unless explicitly disabled.
#[must_use]
pub fn price_options(product: &Product) -> Vec<PriceOption> {
    let mut options = Vec::with_capacity(3);
    if product.unit_enabled {
        options.push(PriceOption {
            sale_type: SaleType::Unit,
            unit_count: 1,
            price: unit_price(product),
        });
    }
    if let Some(price) = pack_price(product) {
        options.push(PriceOption {
            sale_type: SaleType::Pack,
            unit_count: product.units_per_pack.unwrap_or(DEFAULT_UNITS_PER_PACK),
            price,
        });
    }
    if let Some(price) = wholesale_price(product) {
        options.push(PriceOption {
            sale_type: SaleType::Wholesale,
            unit_count: product.wholesale_units.unwrap_or(DEFAULT_WHOLESALE_UNITS),
            price,
        });
    }
    options
}

/// Price of one count of `sale_type` for this product.
///
/// Falls back to the unit price when the requested mode is not enabled,
/// so a stale client cart never prices a line at zero.
#[must_use]
pub fn price_for(product: &Product, sale_type: SaleType) -> Decimal {
    match sale_type {
        SaleType::Unit => unit_price(product),
        SaleType::Pack => pack_price(product).unwrap_or_else(|| unit_price(product)),
        SaleType::Wholesale => wholesale_price(product).unwrap_or_else(|| unit_price(product)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::test_fixtures::product;

    #[test]
    fn test_unit_price_is_base_price() {
        let p = product(1, 1500);
        assert_eq!(unit_price(&p), Decimal::from(1500));
    }

    #[test]
    fn test_pack_price_disabled() {
        let p = product(1, 1500);
        assert_eq!(pack_price(&p), None);
    }

    #[test]
    fn test_pack_price_formula() {
        let mut p = product(1, 1500);
        p.pack_enabled = true;
        p.units_per_pack = Some(6);
        p.pack_discount_pct = Some(Decimal::from(10));
        // 1500 * 6 * 0.9 = 8100
        assert_eq!(pack_price(&p), Some(Decimal::from(8100)));
    }

    #[test]
    fn test_pack_price_zero_discount_is_units_times_price() {
        let mut p = product(1, 1500);
        p.pack_enabled = true;
        p.units_per_pack = Some(4);
        p.pack_discount_pct = Some(Decimal::ZERO);
        assert_eq!(pack_price(&p), Some(Decimal::from(6000)));
    }

    #[test]
    fn test_pack_price_defaults() {
        let mut p = product(1, 1500);
        p.pack_enabled = true;
        // units_per_pack defaults to 1, discount to 0.
        assert_eq!(pack_price(&p), Some(Decimal::from(1500)));
    }

    #[test]
    fn test_pack_price_rounds_half_away_from_zero() {
        let mut p = product(1, 0);
        p.price = Decimal::new(99_95, 2); // 99.95
        p.pack_enabled = true;
        p.units_per_pack = Some(3);
        p.pack_discount_pct = Some(Decimal::from(5));
        // 99.95 * 3 * 0.95 = 284.8575 -> 285
        assert_eq!(pack_price(&p), Some(Decimal::from(285)));
    }

    #[test]
    fn test_wholesale_price_formula() {
        let mut p = product(1, 1000);
        p.wholesale_enabled = true;
        p.wholesale_units = Some(50);
        p.wholesale_discount_pct = Some(Decimal::from(30));
        // 1000 * 50 * 0.7 = 35000
        assert_eq!(wholesale_price(&p), Some(Decimal::from(35_000)));
    }

    #[test]
    fn test_wholesale_price_defaults() {
        let mut p = product(1, 1000);
        p.wholesale_enabled = true;
        // 1000 * 20 * 0.8 = 16000
        assert_eq!(wholesale_price(&p), Some(Decimal::from(16_000)));
    }

    #[test]
    fn test_price_options_order_and_default() {
        let mut p = product(1, 1500);
        p.pack_enabled = true;
        p.units_per_pack = Some(6);
        p.wholesale_enabled = true;
        let options = price_options(&p);
        let types: Vec<SaleType> = options.iter().map(|o| o.sale_type).collect();
        assert_eq!(types, vec![SaleType::Unit, SaleType::Pack, SaleType::Wholesale]);
        assert_eq!(options.first().map(|o| o.sale_type), Some(SaleType::Unit));
    }

    #[test]
    fn test_price_options_unit_disabled() {
        let mut p = product(1, 1500);
        p.unit_enabled = false;
        p.pack_enabled = true;
        let options = price_options(&p);
        assert_eq!(options.first().map(|o| o.sale_type), Some(SaleType::Pack));
    }

    #[test]
    fn test_calculator_is_idempotent() {
        let mut p = product(1, 1234);
        p.pack_enabled = true;
        p.units_per_pack = Some(3);
        p.pack_discount_pct = Some(Decimal::from(15));
        p.wholesale_enabled = true;
        assert_eq!(price_options(&p), price_options(&p));
    }

    #[test]
    fn test_price_for_falls_back_to_unit() {
        let p = product(1, 1500);
        assert_eq!(price_for(&p, SaleType::Pack), Decimal::from(1500));
        assert_eq!(price_for(&p, SaleType::Wholesale), Decimal::from(1500));
    }
}
