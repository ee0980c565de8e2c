//! Cached catalog reads.

use std::sync::Arc;

use crafteo_core::product::Product;

use crate::db::ProductRepository;
use crate::error::AppError;
use crate::state::AppState;

const CATALOG_KEY: &str = "active";

/// The active catalog, served from a short-lived cache.
///
/// One minute of staleness is acceptable for listings; checkout re-reads
/// products directly.
///
/// # Errors
///
/// Returns [`AppError::Database`] if the underlying query fails.
pub async fn active_products(state: &AppState) -> Result<Arc<Vec<Product>>, AppError> {
    state
        .catalog_cache()
        .try_get_with(CATALOG_KEY, async {
            let products = ProductRepository::new(state.pool())
                .list_active(None, None)
                .await?;
            Ok::<_, crate::db::RepositoryError>(Arc::new(products))
        })
        .await
        .map_err(|e: Arc<crate::db::RepositoryError>| AppError::Internal(e.to_string()))
}
