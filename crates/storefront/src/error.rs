//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers return `Result<T, AppError>`
//! and errors render as a JSON body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crafteo_core::cart::CartError;
use crafteo_core::order::OrderValidationError;
use crafteo_core::shipping::ShippingError;

use crate::carrier::CarrierError;
use crate::db::{CheckoutError, RepositoryError};
use crate::payments::PaymentError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Checkout input failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A tracked product ran out of stock during checkout.
    #[error("Out of stock: {0}")]
    OutOfStock(String),

    /// The carrier could not quote the requested shipping method.
    #[error("Shipping quote unavailable: {0}")]
    ShippingQuote(String),

    /// Payment gateway operation failed.
    #[error("Payment error: {0}")]
    Payment(#[from] PaymentError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<OrderValidationError> for AppError {
    fn from(e: OrderValidationError) -> Self {
        Self::Validation(e.to_string())
    }
}

impl From<CartError> for AppError {
    fn from(e: CartError) -> Self {
        Self::Validation(e.to_string())
    }
}

impl From<ShippingError> for AppError {
    fn from(e: ShippingError) -> Self {
        Self::ShippingQuote(e.to_string())
    }
}

impl From<CarrierError> for AppError {
    fn from(e: CarrierError) -> Self {
        Self::ShippingQuote(e.to_string())
    }
}

impl From<CheckoutError> for AppError {
    fn from(e: CheckoutError) -> Self {
        match e {
            CheckoutError::InsufficientStock { .. } => Self::OutOfStock(e.to_string()),
            CheckoutError::Repository(inner) => Self::Database(inner),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Database(_) | Self::Internal(_) | Self::Payment(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Database(RepositoryError::NotFound) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::OutOfStock(_) => StatusCode::CONFLICT,
            Self::ShippingQuote(_) | Self::Payment(_) => StatusCode::BAD_GATEWAY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(RepositoryError::NotFound) => "No encontrado".to_string(),
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Payment(_) => "No pudimos iniciar el pago; intentá de nuevo".to_string(),
            Self::ShippingQuote(msg) => msg.clone(),
            _ => self.to_string(),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            status_of(AppError::Validation("x".to_string())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(AppError::OutOfStock("x".to_string())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::ShippingQuote("x".to_string())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(AppError::NotFound("x".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::Internal("x".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_error_converts() {
        let err: AppError = OrderValidationError::EmptyCart.into();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_carrier_error_blocks_with_bad_gateway() {
        let err: AppError = CarrierError::NoOptions.into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
