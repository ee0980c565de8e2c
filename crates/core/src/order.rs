//! Order records and checkout input validation.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{OrderId, OrderStatus, PaymentStatus, ProductId, SaleType, ShippingMethod};

/// Customer contact and delivery fields captured at checkout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
}

/// One line of a persisted order.
///
/// A snapshot: the price is the price at the time of the order and never
/// re-reads the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    /// Price of one count of `sale_type` at order time.
    pub unit_price: Decimal,
    pub quantity: i32,
    #[serde(default)]
    pub sale_type: SaleType,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Customer-selected customization options.
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl OrderItem {
    /// Line total: price × quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// A persisted order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Server-assigned, human-friendly sequential number.
    pub order_number: i64,
    pub customer: CustomerInfo,
    pub items: Vec<OrderItem>,
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub total: Decimal,
    pub shipping_method: ShippingMethod,
    pub status: OrderStatus,
    pub tracking_number: Option<String>,
    pub payment_id: Option<String>,
    pub payment_status: Option<PaymentStatus>,
    /// Partial payment already received, if any.
    pub deposit_amount: Option<Decimal>,
    /// Delivery date promised to the customer, if any.
    pub promised_date: Option<NaiveDate>,
    /// Free-text notes. Structured data (deposits, promised dates) lives in
    /// its own columns, never in here.
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Sum of line totals.
    #[must_use]
    pub fn computed_subtotal(&self) -> Decimal {
        self.items.iter().map(OrderItem::line_total).sum()
    }
}

/// One requested line at checkout; prices are recomputed server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub quantity: i32,
    #[serde(default)]
    pub sale_type: SaleType,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// Checkout request: what the customer submits to create an order.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrder {
    pub customer: CustomerInfo,
    pub items: Vec<NewOrderItem>,
    pub shipping_method: ShippingMethod,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Checkout input validation failures. All map to a 422 for the client.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("the cart is empty")]
    EmptyCart,
    #[error("item quantity must be at least 1")]
    NonPositiveQuantity,
    #[error("shipping method {0} requires an address and postal code")]
    AddressRequired(ShippingMethod),
}

impl NewOrder {
    /// Validate the checkout request before any pricing or persistence.
    ///
    /// # Errors
    ///
    /// Returns the first [`OrderValidationError`] found: missing contact
    /// fields, an empty cart, a non-positive quantity, or a missing
    /// address/postal code for a method that delivers.
    pub fn validate(&self) -> Result<(), OrderValidationError> {
        for (label, value) in [
            ("name", &self.customer.name),
            ("email", &self.customer.email),
            ("phone", &self.customer.phone),
        ] {
            if value.trim().is_empty() {
                return Err(OrderValidationError::MissingField(label));
            }
        }
        if self.items.is_empty() {
            return Err(OrderValidationError::EmptyCart);
        }
        if self.items.iter().any(|item| item.quantity < 1) {
            return Err(OrderValidationError::NonPositiveQuantity);
        }
        if self.shipping_method.requires_address() {
            let has_address = self
                .customer
                .address
                .as_deref()
                .is_some_and(|a| !a.trim().is_empty());
            let has_postal = self
                .customer
                .postal_code
                .as_deref()
                .is_some_and(|p| !p.trim().is_empty());
            if !has_address || !has_postal {
                return Err(OrderValidationError::AddressRequired(self.shipping_method));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_order(method: ShippingMethod) -> NewOrder {
        NewOrder {
            customer: CustomerInfo {
                name: "Ana García".to_string(),
                email: "ana@example.com".to_string(),
                phone: "1155550000".to_string(),
                address: Some("Av. Rivadavia 1234".to_string()),
                city: Some("CABA".to_string()),
                postal_code: Some("1406".to_string()),
            },
            items: vec![NewOrderItem {
                product_id: ProductId::new(1),
                quantity: 2,
                sale_type: SaleType::Unit,
                model: None,
                color: None,
            }],
            shipping_method: method,
            notes: None,
        }
    }

    #[test]
    fn test_validate_accepts_complete_order() {
        assert_eq!(new_order(ShippingMethod::Moto).validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_missing_contact_field() {
        let mut order = new_order(ShippingMethod::Retiro);
        order.customer.email = "  ".to_string();
        assert_eq!(
            order.validate(),
            Err(OrderValidationError::MissingField("email"))
        );
    }

    #[test]
    fn test_validate_rejects_empty_cart() {
        let mut order = new_order(ShippingMethod::Retiro);
        order.items.clear();
        assert_eq!(order.validate(), Err(OrderValidationError::EmptyCart));
    }

    #[test]
    fn test_validate_requires_address_for_delivery_methods() {
        let mut order = new_order(ShippingMethod::Correo);
        order.customer.postal_code = None;
        assert_eq!(
            order.validate(),
            Err(OrderValidationError::AddressRequired(ShippingMethod::Correo))
        );
    }

    #[test]
    fn test_validate_pickup_needs_no_address() {
        let mut order = new_order(ShippingMethod::Retiro);
        order.customer.address = None;
        order.customer.postal_code = None;
        assert_eq!(order.validate(), Ok(()));
    }

    #[test]
    fn test_line_total() {
        let item = OrderItem {
            product_id: ProductId::new(1),
            name: "Maceta".to_string(),
            unit_price: Decimal::from(1500),
            quantity: 3,
            sale_type: SaleType::Unit,
            image_url: None,
            model: None,
            color: None,
        };
        assert_eq!(item.line_total(), Decimal::from(4500));
    }
}
