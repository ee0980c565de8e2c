//! Raw-material management handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crafteo_core::material::RawMaterial;
use crafteo_core::types::RawMaterialId;

use crate::db::MaterialRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::models::material::{AdjustInput, MaterialInput};
use crate::state::AppState;

/// Material list filters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    /// Only materials at or below their minimum threshold.
    #[serde(default)]
    pub low_stock: bool,
}

/// A material plus its computed low-stock flag.
#[derive(Debug, Serialize)]
pub struct MaterialView {
    #[serde(flatten)]
    pub material: RawMaterial,
    pub low_stock: bool,
}

impl From<RawMaterial> for MaterialView {
    fn from(material: RawMaterial) -> Self {
        let low_stock = material.is_low_stock();
        Self {
            material,
            low_stock,
        }
    }
}

/// List materials, optionally only the ones running low.
#[instrument(skip(_auth, state))]
pub async fn list(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<MaterialView>>> {
    let materials = MaterialRepository::new(state.pool())
        .list(query.category.as_deref())
        .await?;

    let views = materials
        .into_iter()
        .filter(|m| !query.low_stock || m.is_low_stock())
        .map(MaterialView::from)
        .collect();
    Ok(Json(views))
}

/// Get a material by ID.
#[instrument(skip(_auth, state))]
pub async fn get(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MaterialView>> {
    let material = MaterialRepository::new(state.pool())
        .get(RawMaterialId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("material {id}")))?;
    Ok(Json(material.into()))
}

/// Create a material.
#[instrument(skip(_auth, state, input), fields(name = %input.name))]
pub async fn create(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Json(input): Json<MaterialInput>,
) -> Result<(StatusCode, Json<MaterialView>)> {
    validate(&input)?;
    let material = MaterialRepository::new(state.pool()).create(&input).await?;

    info!(material_id = %material.id, name = %material.name, "material created");
    Ok((StatusCode::CREATED, Json(material.into())))
}

/// Replace a material record.
#[instrument(skip(_auth, state, input))]
pub async fn update(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<MaterialInput>,
) -> Result<Json<MaterialView>> {
    validate(&input)?;
    let material = MaterialRepository::new(state.pool())
        .update(RawMaterialId::new(id), &input)
        .await?;

    info!(material_id = %material.id, "material updated");
    Ok(Json(material.into()))
}

/// Delete a material.
#[instrument(skip(_auth, state))]
pub async fn remove(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    let removed = MaterialRepository::new(state.pool())
        .delete(RawMaterialId::new(id))
        .await?;
    if !removed {
        return Err(AppError::NotFound(format!("material {id}")));
    }

    info!(material_id = id, "material deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Apply a signed manual adjustment (recount, purchase, spoilage).
#[instrument(skip(_auth, state, input), fields(delta = %input.delta))]
pub async fn adjust(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<AdjustInput>,
) -> Result<Json<MaterialView>> {
    if input.reason.trim().is_empty() {
        return Err(AppError::Validation(
            "an adjustment needs a reason".to_string(),
        ));
    }

    let material = MaterialRepository::new(state.pool())
        .adjust(RawMaterialId::new(id), input.delta)
        .await?;

    info!(
        material_id = %material.id,
        name = %material.name,
        delta = %input.delta,
        reason = %input.reason,
        new_quantity = %material.quantity,
        "material adjusted"
    );
    Ok(Json(material.into()))
}

fn validate(input: &MaterialInput) -> Result<()> {
    if input.name.trim().is_empty() {
        return Err(AppError::Validation("material name must not be empty".to_string()));
    }
    if input.quantity.is_sign_negative() || input.min_stock.is_sign_negative() {
        return Err(AppError::Validation(
            "quantities must be non-negative".to_string(),
        ));
    }
    Ok(())
}
