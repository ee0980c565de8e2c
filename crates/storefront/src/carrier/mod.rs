//! Carrier rate API integration for correo shipping.
//!
//! The national carrier quotes a price per parcel; the storefront asks with
//! the aggregated package dimensions and caches answers per destination so
//! a customer stepping back and forth through checkout does not hammer the
//! carrier.

mod client;
mod types;

pub use client::CarrierClient;
pub use types::{CarrierRate, RateRequest, RateRequestDimensions};

use thiserror::Error;

/// Errors from the carrier rate API.
///
/// Every variant blocks checkout for the correo method (unless a fallback
/// fee is configured); a shipping cost is never guessed.
#[derive(Debug, Error)]
pub enum CarrierError {
    /// The request could not be sent.
    #[error("carrier request failed: {0}")]
    Request(String),

    /// The response could not be parsed.
    #[error("carrier response invalid: {0}")]
    Response(String),

    /// The carrier answered but reported a failure.
    #[error("carrier error: {0}")]
    Api(String),

    /// The carrier answered success but offered no usable rate.
    #[error("carrier returned no shipping options")]
    NoOptions,
}
