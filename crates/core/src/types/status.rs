//! Status and classification enums.
//!
//! [`OrderStatus`] is the single source of truth for the order lifecycle.
//! Earlier iterations of the shop used `processing` and `completed` in some
//! back-office views as synonyms for `preparing` and `delivered`; those
//! values still parse (so old rows and old clients keep working) but they
//! never serialize back out.

use serde::{Deserialize, Serialize};

/// Canonical order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order created, nothing paid yet.
    #[default]
    Pending,
    /// Payment preference created, awaiting gateway confirmation.
    PaymentPending,
    /// Payment confirmed by the gateway or the operator.
    Paid,
    /// In production / being prepared for dispatch.
    Preparing,
    /// Handed to the courier or carrier.
    Shipped,
    /// Received by the customer. Terminal.
    Delivered,
    /// Cancelled by the customer or the operator.
    Cancelled,
    /// Delivery details still being arranged with the customer.
    ToCoordinate,
}

/// Display metadata for one order status.
///
/// One table serves every surface: customer tracking, admin lists, emails.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StatusLabel {
    /// Wire value of the status.
    pub code: &'static str,
    /// Short human title.
    pub title: &'static str,
    /// One-line description for the tracking view.
    pub description: &'static str,
    /// Icon token for clients.
    pub icon: &'static str,
}

impl OrderStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 8] = [
        Self::Pending,
        Self::PaymentPending,
        Self::Paid,
        Self::Preparing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
        Self::ToCoordinate,
    ];

    /// Wire value of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::PaymentPending => "payment_pending",
            Self::Paid => "paid",
            Self::Preparing => "preparing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::ToCoordinate => "to_coordinate",
        }
    }

    /// Display metadata for this status.
    #[must_use]
    pub const fn label(&self) -> StatusLabel {
        match self {
            Self::Pending => StatusLabel {
                code: "pending",
                title: "Recibido",
                description: "Recibimos tu pedido y lo estamos revisando.",
                icon: "inbox",
            },
            Self::PaymentPending => StatusLabel {
                code: "payment_pending",
                title: "Pago pendiente",
                description: "Esperando la confirmación del pago.",
                icon: "clock",
            },
            Self::Paid => StatusLabel {
                code: "paid",
                title: "Pagado",
                description: "Pago confirmado. Tu pedido entra a producción.",
                icon: "check-circle",
            },
            Self::Preparing => StatusLabel {
                code: "preparing",
                title: "En preparación",
                description: "Estamos fabricando y embalando tu pedido.",
                icon: "printer",
            },
            Self::Shipped => StatusLabel {
                code: "shipped",
                title: "Enviado",
                description: "Tu pedido está en camino.",
                icon: "truck",
            },
            Self::Delivered => StatusLabel {
                code: "delivered",
                title: "Entregado",
                description: "El pedido fue entregado. ¡Gracias por tu compra!",
                icon: "package-check",
            },
            Self::Cancelled => StatusLabel {
                code: "cancelled",
                title: "Cancelado",
                description: "El pedido fue cancelado.",
                icon: "x-circle",
            },
            Self::ToCoordinate => StatusLabel {
                code: "to_coordinate",
                title: "A coordinar",
                description: "Nos contactaremos para coordinar la entrega.",
                icon: "phone",
            },
        }
    }

    /// Whether a transition from `self` to `next` is allowed.
    ///
    /// `delivered` is terminal; every other transition is permitted (the
    /// shop does reinstate cancelled orders, so `cancelled` is not).
    #[must_use]
    pub fn can_transition_to(&self, next: Self) -> bool {
        if *self == next {
            return true;
        }
        !matches!(self, Self::Delivered)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "payment_pending" => Ok(Self::PaymentPending),
            "paid" => Ok(Self::Paid),
            // Legacy back-office synonyms, folded into the canonical values.
            "preparing" | "processing" => Ok(Self::Preparing),
            "shipped" => Ok(Self::Shipped),
            "delivered" | "completed" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            "to_coordinate" => Ok(Self::ToCoordinate),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// Payment status reported by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Approved,
    Pending,
    InProcess,
    Rejected,
    Refunded,
}

impl PaymentStatus {
    /// Wire value of this payment status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Pending => "pending",
            Self::InProcess => "in_process",
            Self::Rejected => "rejected",
            Self::Refunded => "refunded",
        }
    }

    /// Order status implied by this payment status, if any.
    #[must_use]
    pub const fn implied_order_status(&self) -> Option<OrderStatus> {
        match self {
            Self::Approved => Some(OrderStatus::Paid),
            Self::Pending | Self::InProcess => Some(OrderStatus::PaymentPending),
            Self::Rejected | Self::Refunded => None,
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(Self::Approved),
            "pending" => Ok(Self::Pending),
            "in_process" => Ok(Self::InProcess),
            "rejected" => Ok(Self::Rejected),
            "refunded" => Ok(Self::Refunded),
            _ => Err(format!("invalid payment status: {s}")),
        }
    }
}

/// How an order leaves the workshop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingMethod {
    /// Customer pickup at the workshop.
    Retiro,
    /// Local motorcycle courier, priced by postal-code zone.
    Moto,
    /// National carrier, priced by a live rate quote.
    Correo,
    /// Delivery arranged case by case; no upfront cost.
    ToCoordinate,
}

impl ShippingMethod {
    /// Wire value of this method.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Retiro => "retiro",
            Self::Moto => "moto",
            Self::Correo => "correo",
            Self::ToCoordinate => "to_coordinate",
        }
    }

    /// Whether this method needs a delivery address and postal code.
    #[must_use]
    pub const fn requires_address(&self) -> bool {
        matches!(self, Self::Moto | Self::Correo)
    }
}

impl std::fmt::Display for ShippingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ShippingMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "retiro" => Ok(Self::Retiro),
            "moto" => Ok(Self::Moto),
            "correo" => Ok(Self::Correo),
            "to_coordinate" => Ok(Self::ToCoordinate),
            _ => Err(format!("invalid shipping method: {s}")),
        }
    }
}

/// Sale type under which a cart line was added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SaleType {
    #[default]
    Unit,
    Pack,
    Wholesale,
}

impl SaleType {
    /// Wire value of this sale type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unit => "unit",
            Self::Pack => "pack",
            Self::Wholesale => "wholesale",
        }
    }
}

impl std::fmt::Display for SaleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SaleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unit" => Ok(Self::Unit),
            "pack" => Ok(Self::Pack),
            // The storefront has historically labelled wholesale "mayorista".
            "wholesale" | "mayorista" => Ok(Self::Wholesale),
            _ => Err(format!("invalid sale type: {s}")),
        }
    }
}

/// Manufacturing technology a product is made with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Technology {
    /// FDM 3D printing (PLA).
    #[serde(rename = "3D")]
    ThreeD,
    /// Laser cutting (MDF/plywood).
    #[serde(rename = "Laser")]
    Laser,
}

impl Technology {
    /// Wire value of this technology tag.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ThreeD => "3D",
            Self::Laser => "Laser",
        }
    }
}

impl std::fmt::Display for Technology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Technology {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "3D" | "3d" => Ok(Self::ThreeD),
            "Laser" | "laser" => Ok(Self::Laser),
            _ => Err(format!("invalid technology: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_legacy_status_values_parse_to_canonical() {
        assert_eq!(
            OrderStatus::from_str("processing").expect("parses"),
            OrderStatus::Preparing
        );
        assert_eq!(
            OrderStatus::from_str("completed").expect("parses"),
            OrderStatus::Delivered
        );
        // Canonical values never serialize to the legacy spelling.
        assert_eq!(OrderStatus::Preparing.as_str(), "preparing");
        assert_eq!(OrderStatus::Delivered.as_str(), "delivered");
    }

    #[test]
    fn test_status_roundtrip() {
        for status in OrderStatus::ALL {
            assert_eq!(
                OrderStatus::from_str(status.as_str()).expect("parses"),
                status
            );
        }
    }

    #[test]
    fn test_label_table_covers_every_status() {
        for status in OrderStatus::ALL {
            let label = status.label();
            assert_eq!(label.code, status.as_str());
            assert!(!label.title.is_empty());
            assert!(!label.description.is_empty());
            assert!(!label.icon.is_empty());
        }
    }

    #[test]
    fn test_delivered_is_terminal() {
        for next in OrderStatus::ALL {
            if next == OrderStatus::Delivered {
                assert!(OrderStatus::Delivered.can_transition_to(next));
            } else {
                assert!(!OrderStatus::Delivered.can_transition_to(next));
            }
        }
    }

    #[test]
    fn test_cancelled_can_be_reinstated() {
        assert!(OrderStatus::Cancelled.can_transition_to(OrderStatus::Pending));
        assert!(OrderStatus::Cancelled.can_transition_to(OrderStatus::Preparing));
    }

    #[test]
    fn test_payment_status_implies_order_status() {
        assert_eq!(
            PaymentStatus::Approved.implied_order_status(),
            Some(OrderStatus::Paid)
        );
        assert_eq!(
            PaymentStatus::InProcess.implied_order_status(),
            Some(OrderStatus::PaymentPending)
        );
        assert_eq!(PaymentStatus::Rejected.implied_order_status(), None);
    }

    #[test]
    fn test_shipping_method_address_requirement() {
        assert!(ShippingMethod::Moto.requires_address());
        assert!(ShippingMethod::Correo.requires_address());
        assert!(!ShippingMethod::Retiro.requires_address());
        assert!(!ShippingMethod::ToCoordinate.requires_address());
    }

    #[test]
    fn test_sale_type_accepts_mayorista() {
        assert_eq!(
            SaleType::from_str("mayorista").expect("parses"),
            SaleType::Wholesale
        );
    }
}
