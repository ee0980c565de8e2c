//! Raw-material inventory records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::RawMaterialId;

/// Category that holds filament spools; color-share draws resolve here.
pub const FILAMENT_CATEGORY: &str = "Filamento";

/// Unit of measure for a raw material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialUnit {
    /// Kilograms.
    Kg,
    /// Grams.
    Gram,
    /// Filament spool, treated as 1 kg.
    Spool,
    /// Sheet stock (MDF, plywood, acrylic).
    Sheet,
    /// Discrete units (boxes, screws, bags).
    Unit,
    /// Metres (ribbon, cable).
    Meter,
}

impl MaterialUnit {
    /// Wire value of this unit.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Kg => "kg",
            Self::Gram => "g",
            Self::Spool => "rollo",
            Self::Sheet => "plancha",
            Self::Unit => "unidad",
            Self::Meter => "m",
        }
    }

    /// Convert a gram amount into this unit.
    ///
    /// Kilogram-equivalent units (kg, spools treated as 1 kg) divide by
    /// 1000; grams pass through; other units receive the raw amount, since
    /// recipes quoting them already speak the material's unit.
    #[must_use]
    pub fn from_grams(&self, grams: Decimal) -> Decimal {
        match self {
            Self::Kg | Self::Spool => grams / Decimal::from(1000),
            Self::Gram | Self::Sheet | Self::Unit | Self::Meter => grams,
        }
    }
}

impl std::fmt::Display for MaterialUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MaterialUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kg" => Ok(Self::Kg),
            "g" | "gramos" => Ok(Self::Gram),
            "rollo" | "rollos" => Ok(Self::Spool),
            "plancha" | "planchas" => Ok(Self::Sheet),
            "unidad" | "unidades" => Ok(Self::Unit),
            "m" | "metros" => Ok(Self::Meter),
            _ => Err(format!("invalid material unit: {s}")),
        }
    }
}

/// A raw material tracked in inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMaterial {
    pub id: RawMaterialId,
    pub name: String,
    pub category: String,
    /// Quantity on hand, in `unit`.
    pub quantity: Decimal,
    pub unit: MaterialUnit,
    /// Below this the material is flagged low-stock.
    pub min_stock: Decimal,
}

impl RawMaterial {
    /// Whether the on-hand quantity is at or below the minimum threshold.
    #[must_use]
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.min_stock
    }
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    use super::*;

    pub(crate) fn material(id: i32, name: &str, category: &str, unit: MaterialUnit) -> RawMaterial {
        RawMaterial {
            id: RawMaterialId::new(id),
            name: name.to_string(),
            category: category.to_string(),
            quantity: Decimal::from(10),
            unit,
            min_stock: Decimal::ONE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_fixtures::material;
    use super::*;

    #[test]
    fn test_kg_and_spool_convert_from_grams() {
        assert_eq!(
            MaterialUnit::Kg.from_grams(Decimal::from(250)),
            Decimal::new(25, 2)
        );
        assert_eq!(
            MaterialUnit::Spool.from_grams(Decimal::from(1500)),
            Decimal::new(15, 1)
        );
    }

    #[test]
    fn test_gram_unit_passes_through() {
        assert_eq!(
            MaterialUnit::Gram.from_grams(Decimal::from(140)),
            Decimal::from(140)
        );
    }

    #[test]
    fn test_low_stock_flag() {
        let mut m = material(1, "PLA Blanco", FILAMENT_CATEGORY, MaterialUnit::Kg);
        assert!(!m.is_low_stock());
        m.quantity = Decimal::ONE;
        assert!(m.is_low_stock());
        m.quantity = Decimal::new(5, 1);
        assert!(m.is_low_stock());
    }
}
