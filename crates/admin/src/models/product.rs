//! Product authoring inputs.

use rust_decimal::Decimal;
use serde::Deserialize;

use crafteo_core::product::{Product, Recipe, ValidationError};
use crafteo_core::types::{ProductId, Technology};

/// Input for creating or replacing a product.
///
/// The whole record is sent on every save (the back office edits the full
/// form); optional sale-type fields left out fall back to the calculator
/// defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductInput {
    pub name: String,
    #[serde(default = "default_category")]
    pub category: String,
    pub technology: Technology,
    pub price: Decimal,
    #[serde(default)]
    pub stock: Option<i32>,
    #[serde(default)]
    pub width_cm: Decimal,
    #[serde(default)]
    pub height_cm: Decimal,
    #[serde(default)]
    pub length_cm: Decimal,
    #[serde(default)]
    pub weight_g: Option<Decimal>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default = "default_true")]
    pub unit_enabled: bool,
    #[serde(default)]
    pub pack_enabled: bool,
    #[serde(default)]
    pub units_per_pack: Option<i32>,
    #[serde(default)]
    pub pack_discount_pct: Option<Decimal>,
    #[serde(default)]
    pub wholesale_enabled: bool,
    #[serde(default)]
    pub wholesale_units: Option<i32>,
    #[serde(default)]
    pub wholesale_discount_pct: Option<Decimal>,
    #[serde(default)]
    pub recipe: Option<Recipe>,
    #[serde(default)]
    pub model_options: Vec<String>,
    #[serde(default)]
    pub color_options: Vec<String>,
}

const fn default_true() -> bool {
    true
}

fn default_category() -> String {
    "General".to_string()
}

impl ProductInput {
    /// Build the domain product this input describes and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when the record fails authoring
    /// validation (negative prices, color shares over 100%, ...).
    pub fn into_product(self, id: ProductId) -> Result<Product, ValidationError> {
        let product = Product {
            id,
            name: self.name,
            category: self.category,
            technology: self.technology,
            price: self.price,
            stock: self.stock,
            width_cm: self.width_cm,
            height_cm: self.height_cm,
            length_cm: self.length_cm,
            weight_g: self.weight_g,
            image_url: self.image_url,
            active: self.active,
            unit_enabled: self.unit_enabled,
            pack_enabled: self.pack_enabled,
            units_per_pack: self.units_per_pack,
            pack_discount_pct: self.pack_discount_pct,
            wholesale_enabled: self.wholesale_enabled,
            wholesale_units: self.wholesale_units,
            wholesale_discount_pct: self.wholesale_discount_pct,
            recipe: self.recipe.filter(|r| !r.is_empty()),
            model_options: self.model_options,
            color_options: self.color_options,
        };
        product.validate()?;
        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crafteo_core::product::{ColorShare, ValidationError};

    fn input() -> ProductInput {
        ProductInput {
            name: "Maceta geométrica".to_string(),
            category: "Hogar".to_string(),
            technology: Technology::ThreeD,
            price: Decimal::from(4500),
            stock: Some(12),
            width_cm: Decimal::from(10),
            height_cm: Decimal::from(9),
            length_cm: Decimal::from(10),
            weight_g: Some(Decimal::from(120)),
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
            color_options: vec!["Blanco".to_string(), "Negro".to_string()],
        }
    }

    #[test]
    fn test_into_product_validates() {
        let product = input()
            .into_product(ProductId::new(1))
            .expect("valid input");
        assert_eq!(product.name, "Maceta geométrica");
    }

    #[test]
    fn test_into_product_rejects_excess_color_shares() {
        let mut bad = input();
        bad.recipe = Some(Recipe {
            consumables: Vec::new(),
            color_shares: vec![
                ColorShare {
                    color: "Blanco".to_string(),
                    percentage: Decimal::from(80),
                },
                ColorShare {
                    color: "Negro".to_string(),
                    percentage: Decimal::from(30),
                },
            ],
        });
        assert!(matches!(
            bad.into_product(ProductId::new(1)),
            Err(ValidationError::ColorSharesExceedWeight(_))
        ));
    }

    #[test]
    fn test_empty_recipe_is_dropped() {
        let mut empty = input();
        empty.recipe = Some(Recipe::default());
        let product = empty
            .into_product(ProductId::new(1))
            .expect("valid input");
        assert!(product.recipe.is_none());
    }
}
