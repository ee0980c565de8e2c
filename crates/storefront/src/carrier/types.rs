//! Wire types for the carrier rate API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crafteo_core::packaging::PackageDims;

/// Rate quote request body.
#[derive(Debug, Clone, Serialize)]
pub struct RateRequest {
    /// Destination postal code (numeric part).
    pub destination_postal_code: String,
    pub dimensions: RateRequestDimensions,
}

/// Parcel dimensions as the carrier expects them.
#[derive(Debug, Clone, Serialize)]
pub struct RateRequestDimensions {
    /// Width in cm.
    pub width: Decimal,
    /// Height in cm.
    pub height: Decimal,
    /// Length in cm.
    pub length: Decimal,
    /// Weight in grams.
    pub weight: Decimal,
}

impl From<PackageDims> for RateRequestDimensions {
    fn from(dims: PackageDims) -> Self {
        Self {
            width: dims.width_cm,
            height: dims.height_cm,
            length: dims.length_cm,
            weight: dims.weight_g,
        }
    }
}

/// Rate quote response body.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RateResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub default_cost: Option<Decimal>,
    #[serde(default)]
    pub options: Vec<RateOption>,
    #[serde(default)]
    pub selected_option: Option<SelectedOption>,
}

/// One shipping option offered by the carrier.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RateOption {
    pub cost: Decimal,
    #[serde(default)]
    pub estimated_delivery: Option<String>,
}

/// The option the carrier pre-selected.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SelectedOption {
    #[serde(default)]
    pub estimated_delivery: Option<String>,
}

/// A usable quote extracted from the carrier response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarrierRate {
    /// Cost of the cheapest usable option.
    pub cost: Decimal,
    /// Delivery estimate, if the carrier offered one.
    pub estimated_delivery: Option<String>,
}
