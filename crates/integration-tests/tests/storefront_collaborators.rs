//! Storefront collaborator plumbing that works without a network: parcel
//! dimensions on the carrier wire format and payment callback signatures.

use rust_decimal::Decimal;

use crafteo_core::packaging::aggregate_package;
use crafteo_storefront::carrier::RateRequestDimensions;
use crafteo_storefront::config::PaymentConfig;
use crafteo_storefront::payments::PaymentClient;

use crafteo_integration_tests::product;

fn payment_client(secret: Option<&str>) -> PaymentClient {
    PaymentClient::new(&PaymentConfig {
        api_url: "https://api.mercadopago.com".to_string(),
        access_token: secrecy::SecretString::from("APP_USR-token-for-tests"),
        webhook_secret: secret.map(secrecy::SecretString::from),
    })
}

/// The aggregated parcel maps 1:1 onto the carrier's request fields.
#[test]
fn test_parcel_maps_onto_carrier_request() {
    let mut p = product(1, 1000);
    p.weight_g = Some(Decimal::from(250));
    let dims = aggregate_package([(&p, 2)]);

    let wire = RateRequestDimensions::from(dims);
    assert_eq!(wire.width, dims.width_cm);
    assert_eq!(wire.height, dims.height_cm);
    assert_eq!(wire.length, dims.length_cm);
    assert_eq!(wire.weight, dims.weight_g);
    // 2 × 250 g + 100 g margin.
    assert_eq!(wire.weight, Decimal::from(600));
}

/// Without a configured secret the callback is accepted as-is; with one,
/// a junk signature is rejected.
#[test]
fn test_callback_signature_policy() {
    let open = payment_client(None);
    assert!(open.verify_callback("0", "order_id=1", "v0=junk").is_ok());

    let strict = payment_client(Some("callback-signing-secret"));
    assert!(strict.verify_callback("0", "order_id=1", "v0=junk").is_err());
}
