//! Shipping quote orchestration.
//!
//! The zone rules are pure and live in core; this service loads the
//! configuration, talks to the carrier for correo and composes the final
//! answer. A failed carrier quote blocks the method unless a fallback fee
//! is explicitly configured - never a silent guess.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{instrument, warn};

use crafteo_core::packaging::aggregate_package;
use crafteo_core::product::Product;
use crafteo_core::shipping::{mail_cost, moto_cost};
use crafteo_core::types::ShippingMethod;

use crate::db::ShippingRepository;
use crate::error::AppError;
use crate::state::AppState;

/// A computed shipping quote.
#[derive(Debug, Clone, Serialize)]
pub struct ShippingQuote {
    pub method: ShippingMethod,
    pub cost: Decimal,
    /// Whether a free-shipping rule zeroed the cost.
    pub free: bool,
    /// Carrier delivery estimate, correo only.
    pub estimated_delivery: Option<String>,
}

/// Quote the shipping cost for a cart.
///
/// `lines` pairs each product with the ordered quantity; `subtotal` is the
/// already-computed merchandise subtotal.
///
/// # Errors
///
/// Returns [`AppError::Validation`] when correo is requested without a
/// postal code, [`AppError::ShippingQuote`] when the carrier cannot quote
/// and no fallback fee is configured, or [`AppError::Database`] on
/// configuration read failures.
#[instrument(skip(state, lines), fields(method = %method, subtotal = %subtotal))]
pub async fn quote(
    state: &AppState,
    method: ShippingMethod,
    postal_code: Option<&str>,
    lines: &[(Product, i32)],
    subtotal: Decimal,
) -> Result<ShippingQuote, AppError> {
    let repo = ShippingRepository::new(state.pool());
    let config = repo.get_config().await?;

    match method {
        ShippingMethod::Retiro | ShippingMethod::ToCoordinate => Ok(ShippingQuote {
            method,
            cost: Decimal::ZERO,
            free: true,
            estimated_delivery: None,
        }),
        ShippingMethod::Moto => {
            let zones = repo.list_active_zones().await?;
            let cost = moto_cost(subtotal, postal_code, &config, &zones);
            Ok(ShippingQuote {
                method,
                cost,
                free: cost.is_zero(),
                estimated_delivery: None,
            })
        }
        ShippingMethod::Correo => {
            // Free-shipping threshold first: no carrier round trip needed.
            if subtotal >= config.mail_free_threshold {
                return Ok(ShippingQuote {
                    method,
                    cost: Decimal::ZERO,
                    free: true,
                    estimated_delivery: None,
                });
            }

            let postal = postal_code.filter(|p| !p.trim().is_empty()).ok_or_else(|| {
                AppError::Validation("el envío por correo necesita un código postal".to_string())
            })?;

            let dims = aggregate_package(lines.iter().map(|(p, q)| (p, *q)));
            let (quoted, estimated_delivery) = match state.carrier().quote(postal, dims).await {
                Ok(rate) => (Some(rate.cost), rate.estimated_delivery),
                Err(e) => {
                    warn!(error = %e, "carrier quote failed");
                    (None, None)
                }
            };

            let cost = mail_cost(subtotal, &config, quoted)?;
            Ok(ShippingQuote {
                method,
                cost,
                free: cost.is_zero(),
                estimated_delivery,
            })
        }
    }
}
