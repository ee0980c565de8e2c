//! Product records, recipes and authoring validation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{ProductId, RawMaterialId, Technology};

/// A catalog product.
///
/// Prices are ARS. `stock: None` means the product is made to order with no
/// tracked inventory. Dimensions are centimetres, weight grams; a missing
/// weight is estimated from the technology (see [`crate::packaging`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub technology: Technology,
    /// Base unit price.
    pub price: Decimal,
    /// Units on hand; `None` = unlimited.
    pub stock: Option<i32>,
    pub width_cm: Decimal,
    pub height_cm: Decimal,
    pub length_cm: Decimal,
    /// Declared weight per unit, grams.
    pub weight_g: Option<Decimal>,
    /// Primary image (at most one).
    pub image_url: Option<String>,
    pub active: bool,

    // Sale-type configuration.
    pub unit_enabled: bool,
    pub pack_enabled: bool,
    pub units_per_pack: Option<i32>,
    pub pack_discount_pct: Option<Decimal>,
    pub wholesale_enabled: bool,
    pub wholesale_units: Option<i32>,
    pub wholesale_discount_pct: Option<Decimal>,

    /// Raw-material consumption declared for this product.
    pub recipe: Option<Recipe>,

    // Customization options offered to the customer.
    #[serde(default)]
    pub model_options: Vec<String>,
    #[serde(default)]
    pub color_options: Vec<String>,
}

/// Declared raw-material consumption for one unit of a product.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Recipe {
    /// Fixed consumables (boxes, screws, bags, ...).
    #[serde(default)]
    pub consumables: Vec<ConsumableEntry>,
    /// Filament usage as a share of the declared product weight, per color.
    #[serde(default)]
    pub color_shares: Vec<ColorShare>,
}

impl Recipe {
    /// Whether the recipe declares no consumption at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.consumables.is_empty() && self.color_shares.is_empty()
    }
}

/// One fixed consumable drawn per unit sold.
///
/// `material_id` is the authoritative binding, set when the product is
/// authored. `material_name` remains the display name and the fuzzy fallback
/// for recipes created before the explicit binding existed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumableEntry {
    #[serde(default)]
    pub material_id: Option<RawMaterialId>,
    pub material_name: String,
    /// Optional category constraint for name resolution.
    #[serde(default)]
    pub category: Option<String>,
    /// Amount drawn per unit sold, in the material's own unit.
    pub quantity_per_unit: Decimal,
}

/// Share of the product weight printed in one filament color.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorShare {
    pub color: String,
    /// Percentage of the declared product weight, `(0, 100]`.
    pub percentage: Decimal,
}

/// Validation failures on the product authoring path.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("product name must not be empty")]
    EmptyName,
    #[error("price must be non-negative")]
    NegativePrice,
    #[error("stock must be non-negative")]
    NegativeStock,
    #[error("{0} discount must be between 0 and 100")]
    DiscountOutOfRange(&'static str),
    #[error("{0} units must be at least 1")]
    UnitsBelowOne(&'static str),
    #[error("consumable '{0}' must draw a positive quantity")]
    NonPositiveConsumable(String),
    #[error("color share '{0}' must be in (0, 100]")]
    ColorShareOutOfRange(String),
    #[error("color shares sum to {0}%, more than 100%")]
    ColorSharesExceedWeight(Decimal),
}

impl Product {
    /// Validate a product before it is written to the catalog.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found: empty name, negative
    /// price/stock, out-of-range discounts, non-positive pack/wholesale unit
    /// counts, non-positive consumable quantities, or color shares outside
    /// `(0, 100]` or summing past 100%.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.price.is_sign_negative() {
            return Err(ValidationError::NegativePrice);
        }
        if self.stock.is_some_and(|s| s < 0) {
            return Err(ValidationError::NegativeStock);
        }

        let hundred = Decimal::ONE_HUNDRED;
        for (label, discount) in [
            ("pack", self.pack_discount_pct),
            ("wholesale", self.wholesale_discount_pct),
        ] {
            if let Some(d) = discount
                && (d.is_sign_negative() || d > hundred)
            {
                return Err(ValidationError::DiscountOutOfRange(label));
            }
        }
        for (label, units) in [
            ("pack", self.units_per_pack),
            ("wholesale", self.wholesale_units),
        ] {
            if let Some(u) = units
                && u < 1
            {
                return Err(ValidationError::UnitsBelowOne(label));
            }
        }

        if let Some(recipe) = &self.recipe {
            for entry in &recipe.consumables {
                if entry.quantity_per_unit <= Decimal::ZERO {
                    return Err(ValidationError::NonPositiveConsumable(
                        entry.material_name.clone(),
                    ));
                }
            }
            let mut sum = Decimal::ZERO;
            for share in &recipe.color_shares {
                if share.percentage <= Decimal::ZERO || share.percentage > hundred {
                    return Err(ValidationError::ColorShareOutOfRange(share.color.clone()));
                }
                sum += share.percentage;
            }
            if sum > hundred {
                return Err(ValidationError::ColorSharesExceedWeight(sum));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    use super::*;

    /// A minimal valid product for tests; callers override what they need.
    pub(crate) fn product(id: i32, price: i64) -> Product {
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
}

#[cfg(test)]
mod tests {
    use super::test_fixtures::product;
    use super::*;

    #[test]
    fn test_validate_accepts_minimal_product() {
        assert_eq!(product(1, 1500).validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_negative_price() {
        let mut p = product(1, 1500);
        p.price = Decimal::from(-1);
        assert_eq!(p.validate(), Err(ValidationError::NegativePrice));
    }

    #[test]
    fn test_validate_rejects_discount_above_100() {
        let mut p = product(1, 1500);
        p.pack_enabled = true;
        p.pack_discount_pct = Some(Decimal::from(150));
        assert_eq!(
            p.validate(),
            Err(ValidationError::DiscountOutOfRange("pack"))
        );
    }

    #[test]
    fn test_validate_rejects_color_shares_over_100() {
        let mut p = product(1, 1500);
        p.recipe = Some(Recipe {
            consumables: Vec::new(),
            color_shares: vec![
                ColorShare {
                    color: "Blanco".to_string(),
                    percentage: Decimal::from(70),
                },
                ColorShare {
                    color: "Rojo".to_string(),
                    percentage: Decimal::from(40),
                },
            ],
        });
        assert_eq!(
            p.validate(),
            Err(ValidationError::ColorSharesExceedWeight(Decimal::from(110)))
        );
    }

    #[test]
    fn test_validate_accepts_color_shares_at_exactly_100() {
        let mut p = product(1, 1500);
        p.recipe = Some(Recipe {
            consumables: Vec::new(),
            color_shares: vec![
                ColorShare {
                    color: "Blanco".to_string(),
                    percentage: Decimal::from(70),
                },
                ColorShare {
                    color: "Rojo".to_string(),
                    percentage: Decimal::from(30),
                },
            ],
        });
        assert_eq!(p.validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_zero_quantity_consumable() {
        let mut p = product(1, 1500);
        p.recipe = Some(Recipe {
            consumables: vec![ConsumableEntry {
                material_id: None,
                material_name: "Caja".to_string(),
                category: None,
                quantity_per_unit: Decimal::ZERO,
            }],
            color_shares: Vec::new(),
        });
        assert_eq!(
            p.validate(),
            Err(ValidationError::NonPositiveConsumable("Caja".to_string()))
        );
    }
}
