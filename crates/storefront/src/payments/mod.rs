//! Payment gateway integration.
//!
//! The gateway is Mercado Pago-shaped: checkout creates a *preference* (the
//! order's items plus payer email) and receives a redirect URL; after the
//! customer pays, the browser returns through a callback carrying the order
//! id, payment id and status. The gateway's internals are opaque to us.

mod client;
mod types;

pub use client::PaymentClient;
pub use types::{PaymentPreference, PreferenceItem};

use thiserror::Error;

/// Errors from the payment gateway.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// The request could not be sent.
    #[error("payment request failed: {0}")]
    Request(String),

    /// The response could not be parsed.
    #[error("payment response invalid: {0}")]
    Response(String),

    /// The gateway answered with an error.
    #[error("payment gateway error: {0}")]
    Api(String),

    /// A callback signature did not verify.
    #[error("invalid callback signature: {0}")]
    InvalidSignature(String),
}
