//! Shipping configuration handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::{info, instrument};

use crafteo_core::shipping::{ShippingConfig, ShippingZone};
use crafteo_core::types::ShippingZoneId;

use crate::db::ShippingRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::models::shipping::{ShippingConfigInput, ShippingZoneInput};
use crate::state::AppState;

/// Get the shipping config singleton.
#[instrument(skip(_auth, state))]
pub async fn get_config(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<ShippingConfig>> {
    let config = ShippingRepository::new(state.pool()).get_config().await?;
    Ok(Json(config))
}

/// Replace the shipping config singleton.
#[instrument(skip(_auth, state, input))]
pub async fn update_config(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Json(input): Json<ShippingConfigInput>,
) -> Result<Json<ShippingConfig>> {
    validate_config(&input)?;
    let config = ShippingRepository::new(state.pool())
        .update_config(&input)
        .await?;

    info!("shipping config updated");
    Ok(Json(config))
}

/// List all zones.
#[instrument(skip(_auth, state))]
pub async fn list_zones(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<ShippingZone>>> {
    let zones = ShippingRepository::new(state.pool()).list_zones().await?;
    Ok(Json(zones))
}

/// Create a zone.
#[instrument(skip(_auth, state, input), fields(name = %input.name))]
pub async fn create_zone(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Json(input): Json<ShippingZoneInput>,
) -> Result<(StatusCode, Json<ShippingZone>)> {
    validate_zone(&input)?;
    let zone = ShippingRepository::new(state.pool()).create_zone(&input).await?;

    info!(zone_id = %zone.id, name = %zone.name, "shipping zone created");
    Ok((StatusCode::CREATED, Json(zone)))
}

/// Replace a zone.
#[instrument(skip(_auth, state, input))]
pub async fn update_zone(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<ShippingZoneInput>,
) -> Result<Json<ShippingZone>> {
    validate_zone(&input)?;
    let zone = ShippingRepository::new(state.pool())
        .update_zone(ShippingZoneId::new(id), &input)
        .await?;

    info!(zone_id = %zone.id, "shipping zone updated");
    Ok(Json(zone))
}

/// Delete a zone.
#[instrument(skip(_auth, state))]
pub async fn delete_zone(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    let removed = ShippingRepository::new(state.pool())
        .delete_zone(ShippingZoneId::new(id))
        .await?;
    if !removed {
        return Err(AppError::NotFound(format!("zone {id}")));
    }

    info!(zone_id = id, "shipping zone deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn validate_config(input: &ShippingConfigInput) -> Result<()> {
    for (label, value) in [
        ("moto_free_threshold", input.moto_free_threshold),
        ("moto_base_fee", input.moto_base_fee),
        ("mail_free_threshold", input.mail_free_threshold),
    ] {
        if value.is_sign_negative() {
            return Err(AppError::Validation(format!("{label} must be non-negative")));
        }
    }
    if input
        .mail_fallback_fee
        .is_some_and(|f| f.is_sign_negative())
    {
        return Err(AppError::Validation(
            "mail_fallback_fee must be non-negative".to_string(),
        ));
    }
    Ok(())
}

fn validate_zone(input: &ShippingZoneInput) -> Result<()> {
    if input.name.trim().is_empty() {
        return Err(AppError::Validation("zone name must not be empty".to_string()));
    }
    if input.cp_from > input.cp_to {
        return Err(AppError::Validation(
            "cp_from must not exceed cp_to".to_string(),
        ));
    }
    if input.price.is_sign_negative() {
        return Err(AppError::Validation("zone price must be non-negative".to_string()));
    }
    Ok(())
}
