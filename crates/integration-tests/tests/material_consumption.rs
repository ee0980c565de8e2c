//! Raw-material draw planning scenarios: recipes → aggregated draws.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crafteo_core::consumption::plan_draws;
use crafteo_core::material::{FILAMENT_CATEGORY, MaterialUnit, RawMaterial};
use crafteo_core::order::OrderItem;
use crafteo_core::product::{ColorShare, ConsumableEntry, Product, Recipe};
use crafteo_core::types::{ProductId, RawMaterialId, SaleType};

use crafteo_integration_tests::product;

fn material(id: i32, name: &str, category: &str, unit: MaterialUnit) -> RawMaterial {
    RawMaterial {
        id: RawMaterialId::new(id),
        name: name.to_string(),
        category: category.to_string(),
        quantity: Decimal::from(10),
        unit,
        min_stock: Decimal::ONE,
    }
}

fn line(product_id: i32, quantity: i32, color: Option<&str>) -> OrderItem {
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

fn catalog(products: Vec<Product>) -> HashMap<ProductId, Product> {
    products.into_iter().map(|p| (p.id, p)).collect()
}

/// A box per unit, three units ordered: exactly three boxes drawn.
#[test]
fn test_fixed_consumable_scales_with_quantity() {
    let mut p = product(1, 1000);
    p.recipe = Some(Recipe {
        consumables: vec![ConsumableEntry {
            material_id: None,
            material_name: "Caja".to_string(),
            category: None,
            quantity_per_unit: Decimal::ONE,
        }],
        color_shares: Vec::new(),
    });

    let materials = [material(7, "Caja", "Packaging", MaterialUnit::Unit)];
    let plan = plan_draws(&[line(1, 3, None)], &catalog(vec![p]), &materials);

    assert_eq!(plan.draws.len(), 1);
    let draw = plan.draws.first().expect("one draw");
    assert_eq!(draw.material_id, RawMaterialId::new(7));
    assert_eq!(draw.amount, Decimal::from(3));
}

/// The 70/30 filament split: 100 g × 2 units → 140 g white, 60 g red,
/// each converted to the material's own unit.
#[test]
fn test_color_shares_with_unit_conversion() {
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

    let materials = [
        material(1, "PLA Blanco", FILAMENT_CATEGORY, MaterialUnit::Kg),
        material(2, "PLA Rojo", FILAMENT_CATEGORY, MaterialUnit::Gram),
    ];
    let plan = plan_draws(&[line(1, 2, None)], &catalog(vec![p]), &materials);

    let amounts: HashMap<i32, Decimal> = plan
        .draws
        .iter()
        .map(|d| (d.material_id.as_i32(), d.amount))
        .collect();
    // 140 g from a kg spool = 0.140; 60 g from a gram-tracked material.
    assert_eq!(amounts.get(&1), Some(&Decimal::new(140, 3)));
    assert_eq!(amounts.get(&2), Some(&Decimal::from(60)));
}

/// The dominant (>40%) color follows the customer's selection; minority
/// shares keep the recipe color.
#[test]
fn test_customer_color_overrides_dominant_share_only() {
    let mut p = product(1, 1000);
    p.weight_g = Some(Decimal::from(200));
    p.recipe = Some(Recipe {
        consumables: Vec::new(),
        color_shares: vec![
            ColorShare {
                color: "Blanco".to_string(),
                percentage: Decimal::from(60),
            },
            ColorShare {
                color: "Rojo".to_string(),
                percentage: Decimal::from(40),
            },
        ],
    });

    let materials = [
        material(1, "PLA Blanco", FILAMENT_CATEGORY, MaterialUnit::Gram),
        material(2, "PLA Rojo", FILAMENT_CATEGORY, MaterialUnit::Gram),
        material(3, "PLA Azul", FILAMENT_CATEGORY, MaterialUnit::Gram),
    ];
    let plan = plan_draws(&[line(1, 1, Some("Azul"))], &catalog(vec![p]), &materials);

    let amounts: HashMap<i32, Decimal> = plan
        .draws
        .iter()
        .map(|d| (d.material_id.as_i32(), d.amount))
        .collect();
    // 60% (> 40) switches to Azul; 40% (not strictly over) stays Rojo.
    assert_eq!(amounts.get(&3), Some(&Decimal::from(120)));
    assert_eq!(amounts.get(&2), Some(&Decimal::from(80)));
    assert_eq!(amounts.get(&1), None);
}

/// Products without recipes and unknown materials never break planning.
#[test]
fn test_missing_recipes_and_materials_are_skipped() {
    let no_recipe = product(1, 1000);
    let mut unknown_material = product(2, 1000);
    unknown_material.recipe = Some(Recipe {
        consumables: vec![ConsumableEntry {
            material_id: None,
            material_name: "Resorte inexistente".to_string(),
            category: None,
            quantity_per_unit: Decimal::ONE,
        }],
        color_shares: Vec::new(),
    });

    let plan = plan_draws(
        &[line(1, 5, None), line(2, 1, None)],
        &catalog(vec![no_recipe, unknown_material]),
        &[],
    );

    assert!(plan.draws.is_empty());
    assert_eq!(plan.unresolved, vec!["Resorte inexistente".to_string()]);
}

/// Draws for the same material across several order lines aggregate into
/// one decrement.
#[test]
fn test_draws_aggregate_across_order_lines() {
    let recipe = |qty: i64| {
        Some(Recipe {
            consumables: vec![ConsumableEntry {
                material_id: Some(RawMaterialId::new(7)),
                material_name: "Caja".to_string(),
                category: None,
                quantity_per_unit: Decimal::from(qty),
            }],
            color_shares: Vec::new(),
        })
    };
    let mut a = product(1, 1000);
    a.recipe = recipe(1);
    let mut b = product(2, 2000);
    b.recipe = recipe(2);

    let materials = [material(7, "Caja", "Packaging", MaterialUnit::Unit)];
    let plan = plan_draws(
        &[line(1, 2, None), line(2, 3, None)],
        &catalog(vec![a, b]),
        &materials,
    );

    assert_eq!(plan.draws.len(), 1);
    // 1×2 + 2×3 = 8 boxes.
    assert_eq!(plan.draws.first().map(|d| d.amount), Some(Decimal::from(8)));
}

/// Amounts are rounded to three decimals.
#[test]
fn test_draw_amounts_round_to_three_decimals() {
    let mut p = product(1, 1000);
    p.weight_g = Some(Decimal::new(333, 1)); // 33.3 g
    p.recipe = Some(Recipe {
        consumables: Vec::new(),
        color_shares: vec![ColorShare {
            color: "Blanco".to_string(),
            percentage: Decimal::from(100),
        }],
    });

    let materials = [material(1, "PLA Blanco", FILAMENT_CATEGORY, MaterialUnit::Kg)];
    let plan = plan_draws(&[line(1, 1, None)], &catalog(vec![p]), &materials);

    // 33.3 g = 0.0333 kg → 0.033 after rounding.
    assert_eq!(plan.draws.first().map(|d| d.amount), Some(Decimal::new(33, 3)));
}
