//! Database seed command: a starter catalog, inventory and zone table for
//! local development.

use super::{CommandError, connect};

/// Insert demo products, raw materials and shipping zones.
///
/// Refuses to run against a non-empty catalog unless `force` is set.
///
/// # Errors
///
/// Returns [`CommandError`] when the connection or any insert fails, or
/// when the catalog already has products and `force` is not set.
pub async fn run(force: bool) -> Result<(), CommandError> {
    let pool = connect().await?;

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(&pool)
        .await?;
    if existing > 0 && !force {
        return Err(CommandError::Refused(format!(
            "catalog already has {existing} products; re-run with --force to seed anyway"
        )));
    }

    tracing::info!("Seeding raw materials...");
    sqlx::query(
        "INSERT INTO raw_materials (name, category, quantity, unit, min_stock) VALUES
             ('PLA Blanco', 'Filamento', 4.5, 'kg', 1),
             ('PLA Negro', 'Filamento', 3.2, 'kg', 1),
             ('PLA Rojo', 'Filamento', 1.8, 'kg', 0.5),
             ('MDF 3mm', 'Maderas', 25, 'plancha', 5),
             ('Caja carton 15x15', 'Packaging', 120, 'unidad', 20),
             ('Bolsa kraft', 'Packaging', 300, 'unidad', 50)",
    )
    .execute(&pool)
    .await?;

    tracing::info!("Seeding products...");
    sqlx::query(
        r#"INSERT INTO products (
               name, category, technology, price, stock,
               width_cm, height_cm, length_cm, weight_g,
               pack_enabled, units_per_pack, pack_discount_pct,
               wholesale_enabled, wholesale_units, wholesale_discount_pct,
               recipe, color_options
           ) VALUES
           ('Maceta geometrica', 'Hogar', '3D', 4500, 24,
            10, 9, 10, 120,
            TRUE, 3, 10,
            TRUE, 20, 20,
            '{"consumables": [{"material_name": "Caja carton 15x15", "category": "Packaging", "quantity_per_unit": 1}],
              "color_shares": [{"color": "Blanco", "percentage": 100}]}'::jsonb,
            '["Blanco", "Negro", "Rojo"]'::jsonb),
           ('Cartel nombre personalizado', 'Deco', 'Laser', 6800, NULL,
            30, 0.3, 12, NULL,
            FALSE, NULL, NULL,
            FALSE, NULL, NULL,
            '{"consumables": [{"material_name": "MDF 3mm", "category": "Maderas", "quantity_per_unit": 0.25},
                               {"material_name": "Bolsa kraft", "quantity_per_unit": 1}],
              "color_shares": []}'::jsonb,
            '[]'::jsonb),
           ('Soporte celular', 'Escritorio', '3D', 3200, 40,
            8, 12, 9, 85,
            TRUE, 2, 5,
            FALSE, NULL, NULL,
            '{"consumables": [], "color_shares": [{"color": "Negro", "percentage": 100}]}'::jsonb,
            '["Negro", "Blanco"]'::jsonb)"#,
    )
    .execute(&pool)
    .await?;

    tracing::info!("Seeding shipping zones...");
    sqlx::query(
        "INSERT INTO shipping_zones (name, cp_from, cp_to, price, free_threshold) VALUES
             ('CABA', 1000, 1499, 2000, 50000),
             ('GBA Sur', 1800, 1999, 3500, NULL),
             ('GBA Norte', 1600, 1799, 3500, NULL)",
    )
    .execute(&pool)
    .await?;

    tracing::info!("Seed complete!");
    Ok(())
}
