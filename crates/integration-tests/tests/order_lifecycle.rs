//! Order lifecycle: canonical statuses, transitions and checkout
//! validation.

use std::str::FromStr;

use crafteo_core::order::{CustomerInfo, NewOrder, NewOrderItem, OrderValidationError};
use crafteo_core::types::{OrderStatus, ProductId, SaleType, ShippingMethod};

fn checkout_request(method: ShippingMethod) -> NewOrder {
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
            quantity: 1,
            sale_type: SaleType::Unit,
            model: None,
            color: None,
        }],
        shipping_method: method,
        notes: None,
    }
}

/// The legacy back-office spellings fold into the canonical enum and a
/// round trip always lands on the canonical value.
#[test]
fn test_single_source_of_truth_for_statuses() {
    let canonical = OrderStatus::from_str("processing").expect("parses");
    assert_eq!(canonical, OrderStatus::Preparing);
    assert_eq!(canonical.as_str(), "preparing");

    let canonical = OrderStatus::from_str("completed").expect("parses");
    assert_eq!(canonical, OrderStatus::Delivered);
    assert_eq!(canonical.as_str(), "delivered");

    // And every canonical value survives a round trip unchanged.
    for status in OrderStatus::ALL {
        assert_eq!(
            OrderStatus::from_str(status.as_str()).expect("parses"),
            status
        );
    }
}

/// One label table serves every surface and covers every status.
#[test]
fn test_status_labels_cover_all_statuses() {
    for status in OrderStatus::ALL {
        let label = status.label();
        assert_eq!(label.code, status.as_str());
        assert!(!label.title.is_empty());
        assert!(!label.description.is_empty());
    }
}

/// Delivered is terminal; everything else may move anywhere, including a
/// cancelled order being reinstated.
#[test]
fn test_transition_rule() {
    assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Pending));
    assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Shipped));
    assert!(OrderStatus::Delivered.can_transition_to(OrderStatus::Delivered));

    assert!(OrderStatus::Cancelled.can_transition_to(OrderStatus::Preparing));
    assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));
    assert!(OrderStatus::Shipped.can_transition_to(OrderStatus::ToCoordinate));
}

/// Checkout validation walks the rules in order: contact fields, cart,
/// then the address requirement of the chosen method.
#[test]
fn test_checkout_validation_rules() {
    assert_eq!(checkout_request(ShippingMethod::Moto).validate(), Ok(()));

    let mut missing_phone = checkout_request(ShippingMethod::Retiro);
    missing_phone.customer.phone = String::new();
    assert_eq!(
        missing_phone.validate(),
        Err(OrderValidationError::MissingField("phone"))
    );

    let mut empty = checkout_request(ShippingMethod::Retiro);
    empty.items.clear();
    assert_eq!(empty.validate(), Err(OrderValidationError::EmptyCart));

    let mut no_address = checkout_request(ShippingMethod::Correo);
    no_address.customer.address = None;
    assert_eq!(
        no_address.validate(),
        Err(OrderValidationError::AddressRequired(ShippingMethod::Correo))
    );

    // Pickup needs no address at all.
    let mut pickup = checkout_request(ShippingMethod::Retiro);
    pickup.customer.address = None;
    pickup.customer.postal_code = None;
    assert_eq!(pickup.validate(), Ok(()));
}

/// Wire values stay stable for clients.
#[test]
fn test_wire_values() {
    assert_eq!(
        serde_json::to_string(&OrderStatus::ToCoordinate).expect("serializes"),
        "\"to_coordinate\""
    );
    assert_eq!(
        serde_json::to_string(&ShippingMethod::Correo).expect("serializes"),
        "\"correo\""
    );
    let parsed: SaleType = serde_json::from_str("\"wholesale\"").expect("deserializes");
    assert_eq!(parsed, SaleType::Wholesale);
}
