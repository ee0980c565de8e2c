//! Applies planned raw-material draws to the inventory.
//!
//! Planning is pure (core); this service feeds it the catalog and inventory
//! snapshots and applies the result. Application is deliberately best
//! effort: a draw that cannot be applied is logged and skipped, matching
//! how the workshop actually operates - bookkeeping never holds an order
//! hostage.

use std::collections::HashMap;

use sqlx::PgPool;
use tracing::{info, instrument, warn};

use crafteo_core::consumption::plan_draws;
use crafteo_core::order::Order;
use crafteo_core::product::Product;
use crafteo_core::types::ProductId;

use crate::db::{MaterialRepository, ProductRepository, RepositoryError};

/// Draw raw materials for an order per its products' recipes.
///
/// Snapshot read failures propagate (the caller retries with nothing
/// applied yet); individual draw failures are logged and skipped so a
/// retry cannot double-deduct the draws that did land.
///
/// # Errors
///
/// Returns [`RepositoryError`] only when the catalog or inventory snapshot
/// cannot be read.
#[instrument(skip(pool, order), fields(order_id = %order.id))]
pub async fn apply_order_draws(pool: &PgPool, order: &Order) -> Result<(), RepositoryError> {
    let ids: Vec<ProductId> = order.items.iter().map(|i| i.product_id).collect();
    let products: HashMap<ProductId, Product> = ProductRepository::new(pool)
        .get_many(&ids)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let materials = MaterialRepository::new(pool).list_all().await?;
    let plan = plan_draws(&order.items, &products, &materials);

    for missing in &plan.unresolved {
        warn!(order_id = %order.id, entry = %missing, "recipe entry matched no material, skipped");
    }

    let material_repo = MaterialRepository::new(pool);
    for draw in &plan.draws {
        match material_repo.apply_draw(draw.material_id, draw.amount).await {
            Ok(()) => info!(
                material = %draw.material_name,
                amount = %draw.amount,
                "material drawn"
            ),
            Err(e) => warn!(
                material = %draw.material_name,
                error = %e,
                "material draw failed, skipped"
            ),
        }
    }

    Ok(())
}
