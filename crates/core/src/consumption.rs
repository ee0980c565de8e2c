//! Raw-material draw planning.
//!
//! When an order is created, each product's recipe translates into draws
//! against the materials inventory: fixed consumables (boxes, screws) plus
//! filament proportional to the product weight, split by color. Planning is
//! pure (resolution happens against an in-memory materials snapshot);
//! application is a repository concern.
//!
//! Resolution never fails an order: entries that cannot be matched to a
//! material are reported back for logging and skipped.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::material::{FILAMENT_CATEGORY, RawMaterial};
use crate::order::OrderItem;
use crate::product::Product;
use crate::types::{ProductId, RawMaterialId, round_quantity};

/// A recipe color must hold more than this share of the weight before the
/// customer's selected color overrides it.
const COLOR_OVERRIDE_THRESHOLD_PCT: Decimal = Decimal::from_parts(40, 0, 0, false, 0);

/// One pending decrement against a material, in the material's own unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialDraw {
    pub material_id: RawMaterialId,
    pub material_name: String,
    pub amount: Decimal,
}

/// The aggregated result of planning an order's consumption.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsumptionPlan {
    /// One entry per material, amounts aggregated across all lines and
    /// rounded to three decimals, ordered by material id.
    pub draws: Vec<MaterialDraw>,
    /// Recipe entries that matched no material; callers log these.
    pub unresolved: Vec<String>,
}

/// Resolve a material by name: exact case-insensitive match first, then
/// substring in either direction, optionally constrained to a category.
#[must_use]
pub fn resolve_material<'a>(
    materials: &'a [RawMaterial],
    name: &str,
    category: Option<&str>,
) -> Option<&'a RawMaterial> {
    let wanted = name.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }
    let in_category = |m: &&RawMaterial| {
        category.is_none_or(|c| m.category.eq_ignore_ascii_case(c))
    };

    materials
        .iter()
        .filter(in_category)
        .find(|m| m.name.to_lowercase() == wanted)
        .or_else(|| {
            materials.iter().filter(in_category).find(|m| {
                let have = m.name.to_lowercase();
                have.contains(&wanted) || wanted.contains(&have)
            })
        })
}

/// Plan the material draws for an order.
///
/// Per line (scaled by quantity):
/// - products without a recipe draw nothing;
/// - fixed consumables resolve by explicit material id when the recipe
///   carries one, by name otherwise;
/// - color shares of the declared weight resolve inside the filament
///   category, with the customer-selected color substituted for any share
///   above 40%;
/// - gram amounts convert into each material's unit (kg and spools divide
///   by 1000).
#[must_use]
pub fn plan_draws(
    items: &[OrderItem],
    products: &HashMap<ProductId, Product>,
    materials: &[RawMaterial],
) -> ConsumptionPlan {
    let mut totals: HashMap<RawMaterialId, (String, Decimal)> = HashMap::new();
    let mut unresolved = Vec::new();

    let mut add = |material: &RawMaterial, amount: Decimal| {
        let entry = totals
            .entry(material.id)
            .or_insert_with(|| (material.name.clone(), Decimal::ZERO));
        entry.1 += amount;
    };

    for item in items {
        let Some(product) = products.get(&item.product_id) else {
            unresolved.push(format!("producto {} sin ficha en catálogo", item.product_id));
            continue;
        };
        let Some(recipe) = &product.recipe else {
            continue;
        };
        let order_qty = Decimal::from(item.quantity);

        for entry in &recipe.consumables {
            let resolved = entry
                .material_id
                .and_then(|id| materials.iter().find(|m| m.id == id))
                .or_else(|| {
                    resolve_material(materials, &entry.material_name, entry.category.as_deref())
                });
            match resolved {
                Some(material) => add(material, entry.quantity_per_unit * order_qty),
                None => unresolved.push(entry.material_name.clone()),
            }
        }

        if let Some(weight_g) = product.weight_g
            && !recipe.color_shares.is_empty()
        {
            let total_g = weight_g * order_qty;
            for share in &recipe.color_shares {
                let color = if share.percentage > COLOR_OVERRIDE_THRESHOLD_PCT
                    && let Some(selected) = item.color.as_deref()
                {
                    selected
                } else {
                    share.color.as_str()
                };
                let amount_g = total_g * share.percentage / Decimal::ONE_HUNDRED;
                match resolve_material(materials, color, Some(FILAMENT_CATEGORY)) {
                    Some(material) => add(material, material.unit.from_grams(amount_g)),
                    None => unresolved.push(format!("{FILAMENT_CATEGORY} {color}")),
                }
            }
        }
    }

    let mut draws: Vec<MaterialDraw> = totals
        .into_iter()
        .map(|(material_id, (material_name, amount))| MaterialDraw {
            material_id,
            material_name,
            amount: round_quantity(amount),
        })
        .collect();
    draws.sort_by_key(|d| d.material_id);

    ConsumptionPlan { draws, unresolved }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::MaterialUnit;
    use crate::material::test_fixtures::material;
    use crate::product::test_fixtures::product;
    use crate::product::{ColorShare, ConsumableEntry, Recipe};
    use crate::types::SaleType;

    fn item(product_id: i32, quantity: i32, color: Option<&str>) -> OrderItem {
        OrderItem {
            product_id: ProductId::new(product_id),
            name: format!("Producto {product_id}"),
            unit_price: Decimal::from(1000),
            quantity,
            sale_type: SaleType::Unit,
            image_url: None,
            model: None,
            color: color.map(String::from),
        }
    }

    fn consumable(name: &str, qty: i64) -> ConsumableEntry {
        ConsumableEntry {
            material_id: None,
            material_name: name.to_string(),
            category: None,
            quantity_per_unit: Decimal::from(qty),
        }
    }

    fn catalog(products: Vec<Product>) -> HashMap<ProductId, Product> {
        products.into_iter().map(|p| (p.id, p)).collect()
    }

    #[test]
    fn test_product_without_recipe_draws_nothing() {
        let products = catalog(vec![product(1, 1000)]);
        let materials = [material(1, "Caja", "Packaging", MaterialUnit::Unit)];
        let plan = plan_draws(&[item(1, 3, None)], &products, &materials);
        assert!(plan.draws.is_empty());
        assert!(plan.unresolved.is_empty());
    }

    #[test]
    fn test_consumable_scales_with_order_quantity() {
        let mut p = product(1, 1000);
        p.recipe = Some(Recipe {
            consumables: vec![consumable("Caja", 1)],
            color_shares: Vec::new(),
        });
        let products = catalog(vec![p]);
        let materials = [material(7, "Caja", "Packaging", MaterialUnit::Unit)];

        let plan = plan_draws(&[item(1, 3, None)], &products, &materials);
        assert_eq!(
            plan.draws,
            vec![MaterialDraw {
                material_id: RawMaterialId::new(7),
                material_name: "Caja".to_string(),
                amount: Decimal::from(3),
            }]
        );
    }

    #[test]
    fn test_consumable_explicit_id_wins_over_name() {
        let mut p = product(1, 1000);
        p.recipe = Some(Recipe {
            consumables: vec![ConsumableEntry {
                material_id: Some(RawMaterialId::new(9)),
                material_name: "Caja".to_string(),
                category: None,
                quantity_per_unit: Decimal::ONE,
            }],
            color_shares: Vec::new(),
        });
        let products = catalog(vec![p]);
        let materials = [
            material(7, "Caja", "Packaging", MaterialUnit::Unit),
            material(9, "Caja premium", "Packaging", MaterialUnit::Unit),
        ];

        let plan = plan_draws(&[item(1, 2, None)], &products, &materials);
        assert_eq!(
            plan.draws.first().map(|d| d.material_id),
            Some(RawMaterialId::new(9))
        );
    }

    #[test]
    fn test_unmatched_consumable_is_reported_not_fatal() {
        let mut p = product(1, 1000);
        p.recipe = Some(Recipe {
            consumables: vec![consumable("Tornillo M3", 4)],
            color_shares: Vec::new(),
        });
        let products = catalog(vec![p]);

        let plan = plan_draws(&[item(1, 1, None)], &products, &[]);
        assert!(plan.draws.is_empty());
        assert_eq!(plan.unresolved, vec!["Tornillo M3".to_string()]);
    }

    #[test]
    fn test_color_shares_split_weight_and_convert_units() {
        let mut p = product(1, 1000);
        p.weight_g = Some(Decimal::from(100));
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
        let products = catalog(vec![p]);
        let materials = [
            material(1, "PLA Blanco", FILAMENT_CATEGORY, MaterialUnit::Kg),
            material(2, "PLA Rojo", FILAMENT_CATEGORY, MaterialUnit::Gram),
        ];

        // 100 g × 2 units = 200 g total; 140 g white, 60 g red.
        let plan = plan_draws(&[item(1, 2, None)], &products, &materials);
        assert_eq!(
            plan.draws,
            vec![
                MaterialDraw {
                    material_id: RawMaterialId::new(1),
                    material_name: "PLA Blanco".to_string(),
                    amount: Decimal::new(140, 3), // 0.140 kg
                },
                MaterialDraw {
                    material_id: RawMaterialId::new(2),
                    material_name: "PLA Rojo".to_string(),
                    amount: Decimal::from(60), // grams directly
                },
            ]
        );
    }

    #[test]
    fn test_dominant_color_overridden_by_customer_choice() {
        let mut p = product(1, 1000);
        p.weight_g = Some(Decimal::from(100));
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
        let products = catalog(vec![p]);
        let materials = [
            material(1, "PLA Blanco", FILAMENT_CATEGORY, MaterialUnit::Gram),
            material(2, "PLA Rojo", FILAMENT_CATEGORY, MaterialUnit::Gram),
            material(3, "PLA Negro", FILAMENT_CATEGORY, MaterialUnit::Gram),
        ];

        // The 70% share follows the customer's "Negro"; the 30% share stays.
        let plan = plan_draws(&[item(1, 1, Some("Negro"))], &products, &materials);
        assert_eq!(
            plan.draws,
            vec![
                MaterialDraw {
                    material_id: RawMaterialId::new(2),
                    material_name: "PLA Rojo".to_string(),
                    amount: Decimal::from(30),
                },
                MaterialDraw {
                    material_id: RawMaterialId::new(3),
                    material_name: "PLA Negro".to_string(),
                    amount: Decimal::from(70),
                },
            ]
        );
    }

    #[test]
    fn test_minor_color_not_overridden() {
        let mut p = product(1, 1000);
        p.weight_g = Some(Decimal::from(100));
        p.recipe = Some(Recipe {
            consumables: Vec::new(),
            color_shares: vec![ColorShare {
                color: "Rojo".to_string(),
                percentage: Decimal::from(30),
            }],
        });
        let products = catalog(vec![p]);
        let materials = [
            material(2, "PLA Rojo", FILAMENT_CATEGORY, MaterialUnit::Gram),
            material(3, "PLA Negro", FILAMENT_CATEGORY, MaterialUnit::Gram),
        ];

        let plan = plan_draws(&[item(1, 1, Some("Negro"))], &products, &materials);
        assert_eq!(
            plan.draws.first().map(|d| d.material_id),
            Some(RawMaterialId::new(2))
        );
    }

    #[test]
    fn test_filament_resolution_stays_in_category() {
        let mut p = product(1, 1000);
        p.weight_g = Some(Decimal::from(100));
        p.recipe = Some(Recipe {
            consumables: Vec::new(),
            color_shares: vec![ColorShare {
                color: "Blanco".to_string(),
                percentage: Decimal::from(100),
            }],
        });
        let products = catalog(vec![p]);
        // Same name, wrong category: must not match.
        let materials = [material(1, "Pintura Blanco", "Pinturas", MaterialUnit::Gram)];

        let plan = plan_draws(&[item(1, 1, None)], &products, &materials);
        assert!(plan.draws.is_empty());
        assert_eq!(plan.unresolved, vec!["Filamento Blanco".to_string()]);
    }

    #[test]
    fn test_draws_aggregate_across_lines() {
        let mut a = product(1, 1000);
        a.recipe = Some(Recipe {
            consumables: vec![consumable("Caja", 1)],
            color_shares: Vec::new(),
        });
        let mut b = product(2, 2000);
        b.recipe = Some(Recipe {
            consumables: vec![consumable("Caja", 2)],
            color_shares: Vec::new(),
        });
        let products = catalog(vec![a, b]);
        let materials = [material(7, "Caja", "Packaging", MaterialUnit::Unit)];

        let plan = plan_draws(&[item(1, 2, None), item(2, 1, None)], &products, &materials);
        assert_eq!(plan.draws.first().map(|d| d.amount), Some(Decimal::from(4)));
    }

    #[test]
    fn test_resolve_material_exact_before_substring() {
        let materials = [
            material(1, "PLA Blanco Mate", FILAMENT_CATEGORY, MaterialUnit::Kg),
            material(2, "Blanco", FILAMENT_CATEGORY, MaterialUnit::Kg),
        ];
        let found = resolve_material(&materials, "blanco", None).expect("matches");
        assert_eq!(found.id, RawMaterialId::new(2));
    }

    #[test]
    fn test_resolve_material_substring_both_directions() {
        let materials = [material(1, "PLA Blanco", FILAMENT_CATEGORY, MaterialUnit::Kg)];
        assert!(resolve_material(&materials, "Blanco", None).is_some());
        assert!(resolve_material(&materials, "Filamento PLA Blanco 1kg", None).is_some());
    }
}
