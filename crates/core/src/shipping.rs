//! Shipping cost rules.
//!
//! Pickup and "to coordinate" are always free. The local motorcycle courier
//! (`moto`) is priced from a configured postal-code zone table with a global
//! free-shipping threshold. The national carrier (`correo`) is priced from a
//! live rate quoted by the carrier API; only the free-shipping threshold and
//! the explicitly configured fallback fee are decided here. When neither
//! applies and no quote is available, checkout for that method is blocked:
//! a shipping cost is never silently guessed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{ShippingMethod, ShippingZoneId};

/// Global shipping thresholds and fees. Single row, admin-edited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingConfig {
    /// Subtotal at which moto delivery becomes free.
    pub moto_free_threshold: Decimal,
    /// Moto fee when no zone matches the destination.
    pub moto_base_fee: Decimal,
    /// Subtotal at which correo shipping is free regardless of the quote.
    pub mail_free_threshold: Decimal,
    /// Last-resort correo fee when the carrier cannot quote. Applies only
    /// when explicitly configured.
    pub mail_fallback_fee: Option<Decimal>,
}

/// A postal-code range priced for the local courier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingZone {
    pub id: ShippingZoneId,
    pub name: String,
    /// Inclusive numeric postal-code range.
    pub cp_from: i32,
    pub cp_to: i32,
    pub price: Decimal,
    /// Per-zone free threshold; may beat the global one.
    pub free_threshold: Option<Decimal>,
    pub active: bool,
}

impl ShippingZone {
    /// Whether a numeric postal code falls in this zone.
    #[must_use]
    pub const fn contains(&self, postal_code: i32) -> bool {
        postal_code >= self.cp_from && postal_code <= self.cp_to
    }
}

/// Why a shipping cost could not be computed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShippingError {
    /// The national carrier must be consulted and no usable quote exists.
    /// Checkout for the method is blocked; the customer picks another
    /// method or retries.
    #[error("no pudimos cotizar el envío por correo; probá otro método o contactanos")]
    CarrierQuoteUnavailable,
}

/// Extract the numeric part of a postal code.
///
/// Argentine codes come in both the plain (`1824`) and CPA (`B1824XAA`)
/// forms; the digits are what the zone table speaks.
#[must_use]
pub fn parse_postal_code(raw: &str) -> Option<i32> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Cost of moto delivery.
///
/// The global free threshold is evaluated first. Otherwise the first active
/// zone containing the postal code decides: its own free threshold (which
/// may be a better offer) or its price. No matching zone, or no usable
/// postal code, falls back to the base fee.
#[must_use]
pub fn moto_cost(
    subtotal: Decimal,
    postal_code: Option<&str>,
    config: &ShippingConfig,
    zones: &[ShippingZone],
) -> Decimal {
    if subtotal >= config.moto_free_threshold {
        return Decimal::ZERO;
    }

    let Some(cp) = postal_code.and_then(parse_postal_code) else {
        return config.moto_base_fee;
    };

    zones
        .iter()
        .filter(|zone| zone.active)
        .find(|zone| zone.contains(cp))
        .map_or(config.moto_base_fee, |zone| {
            let zone_free = zone.free_threshold.is_some_and(|t| subtotal >= t);
            if zone_free { Decimal::ZERO } else { zone.price }
        })
}

/// Cost of correo delivery given an optional carrier quote.
///
/// # Errors
///
/// Returns [`ShippingError::CarrierQuoteUnavailable`] when the threshold is
/// not met, no quote was obtained and no fallback fee is configured.
pub fn mail_cost(
    subtotal: Decimal,
    config: &ShippingConfig,
    quoted_rate: Option<Decimal>,
) -> Result<Decimal, ShippingError> {
    if subtotal >= config.mail_free_threshold {
        return Ok(Decimal::ZERO);
    }
    quoted_rate
        .or(config.mail_fallback_fee)
        .ok_or(ShippingError::CarrierQuoteUnavailable)
}

/// Shipping cost for any method.
///
/// `quoted_rate` carries the carrier quote for [`ShippingMethod::Correo`];
/// it is ignored for every other method.
///
/// # Errors
///
/// Returns [`ShippingError::CarrierQuoteUnavailable`] for correo without a
/// usable quote (see [`mail_cost`]).
pub fn shipping_cost(
    method: ShippingMethod,
    subtotal: Decimal,
    postal_code: Option<&str>,
    config: &ShippingConfig,
    zones: &[ShippingZone],
    quoted_rate: Option<Decimal>,
) -> Result<Decimal, ShippingError> {
    match method {
        ShippingMethod::Retiro | ShippingMethod::ToCoordinate => Ok(Decimal::ZERO),
        ShippingMethod::Moto => Ok(moto_cost(subtotal, postal_code, config, zones)),
        ShippingMethod::Correo => mail_cost(subtotal, config, quoted_rate),
    }
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    use super::*;

    pub(crate) fn config() -> ShippingConfig {
        ShippingConfig {
            moto_free_threshold: Decimal::from(70_000),
            moto_base_fee: Decimal::from(3500),
            mail_free_threshold: Decimal::from(40_000),
            mail_fallback_fee: None,
        }
    }

    pub(crate) fn zone(id: i32, name: &str, from: i32, to: i32, price: i64) -> ShippingZone {
        ShippingZone {
            id: ShippingZoneId::new(id),
            name: name.to_string(),
            cp_from: from,
            cp_to: to,
            price: Decimal::from(price),
            free_threshold: None,
            active: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_fixtures::{config, zone};
    use super::*;

    #[test]
    fn test_pickup_and_coordinate_are_free() {
        let cfg = config();
        for method in [ShippingMethod::Retiro, ShippingMethod::ToCoordinate] {
            let cost = shipping_cost(method, Decimal::from(100), None, &cfg, &[], None)
                .expect("always computable");
            assert_eq!(cost, Decimal::ZERO);
        }
    }

    #[test]
    fn test_moto_free_above_global_threshold_regardless_of_zone() {
        let cfg = config();
        let zones = [zone(1, "Zona 1", 1000, 1999, 2000)];
        let cost = moto_cost(Decimal::from(75_000), Some("1406"), &cfg, &zones);
        assert_eq!(cost, Decimal::ZERO);
    }

    #[test]
    fn test_moto_zone_price_applies_below_threshold() {
        let cfg = config();
        let zones = [zone(1, "Zona 1", 1000, 1999, 2000)];
        let cost = moto_cost(Decimal::from(58_500), Some("1406"), &cfg, &zones);
        assert_eq!(cost, Decimal::from(2000));
    }

    #[test]
    fn test_moto_zone_free_threshold_beats_zone_price() {
        let cfg = config();
        let mut z = zone(1, "Zona 1", 1000, 1999, 2000);
        z.free_threshold = Some(Decimal::from(50_000));
        let cost = moto_cost(Decimal::from(58_500), Some("1406"), &cfg, &[z]);
        assert_eq!(cost, Decimal::ZERO);
    }

    #[test]
    fn test_moto_first_matching_zone_wins() {
        let cfg = config();
        let zones = [
            zone(1, "Zona 1", 1000, 1999, 2000),
            zone(2, "Zona 1 bis", 1400, 1500, 9999),
        ];
        let cost = moto_cost(Decimal::from(10_000), Some("1406"), &cfg, &zones);
        assert_eq!(cost, Decimal::from(2000));
    }

    #[test]
    fn test_moto_inactive_zone_is_skipped() {
        let cfg = config();
        let mut z = zone(1, "Zona 1", 1000, 1999, 2000);
        z.active = false;
        let cost = moto_cost(Decimal::from(10_000), Some("1406"), &cfg, &[z]);
        assert_eq!(cost, cfg.moto_base_fee);
    }

    #[test]
    fn test_moto_no_match_falls_back_to_base_fee() {
        let cfg = config();
        let zones = [zone(1, "Zona 1", 1000, 1999, 2000)];
        let cost = moto_cost(Decimal::from(10_000), Some("5000"), &cfg, &zones);
        assert_eq!(cost, Decimal::from(3500));
    }

    #[test]
    fn test_moto_missing_postal_code_uses_base_fee() {
        let cfg = config();
        let zones = [zone(1, "Zona 1", 1000, 1999, 2000)];
        assert_eq!(
            moto_cost(Decimal::from(10_000), None, &cfg, &zones),
            Decimal::from(3500)
        );
    }

    #[test]
    fn test_parse_postal_code_cpa_form() {
        assert_eq!(parse_postal_code("B1824XAA"), Some(1824));
        assert_eq!(parse_postal_code("1406"), Some(1406));
        assert_eq!(parse_postal_code("CABA"), None);
    }

    #[test]
    fn test_mail_free_above_threshold_even_with_positive_quote() {
        let cfg = config();
        let cost = mail_cost(Decimal::from(58_500), &cfg, Some(Decimal::from(8000)))
            .expect("threshold met");
        assert_eq!(cost, Decimal::ZERO);
    }

    #[test]
    fn test_mail_uses_quote_below_threshold() {
        let cfg = config();
        let cost =
            mail_cost(Decimal::from(10_000), &cfg, Some(Decimal::from(8000))).expect("quoted");
        assert_eq!(cost, Decimal::from(8000));
    }

    #[test]
    fn test_mail_without_quote_blocks() {
        let cfg = config();
        assert_eq!(
            mail_cost(Decimal::from(10_000), &cfg, None),
            Err(ShippingError::CarrierQuoteUnavailable)
        );
    }

    #[test]
    fn test_mail_configured_fallback_applies() {
        let mut cfg = config();
        cfg.mail_fallback_fee = Some(Decimal::from(9500));
        let cost = mail_cost(Decimal::from(10_000), &cfg, None).expect("fallback configured");
        assert_eq!(cost, Decimal::from(9500));
    }
}
