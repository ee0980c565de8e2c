//! Raw-material authoring inputs.

use rust_decimal::Decimal;
use serde::Deserialize;

use crafteo_core::material::MaterialUnit;

/// Input for creating or replacing a raw material.
#[derive(Debug, Clone, Deserialize)]
pub struct MaterialInput {
    pub name: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub quantity: Decimal,
    pub unit: MaterialUnit,
    #[serde(default)]
    pub min_stock: Decimal,
}

fn default_category() -> String {
    "General".to_string()
}

/// Input for a manual stock adjustment.
#[derive(Debug, Deserialize)]
pub struct AdjustInput {
    /// Signed quantity delta, in the material's unit.
    pub delta: Decimal,
    /// Why the operator adjusted it (spoilage, recount, purchase, ...).
    pub reason: String,
}
