//! Bearer-token authentication for the admin API.
//!
//! The admin service runs on a private network; the token is a second
//! fence, checked in constant time on every request.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use secrecy::ExposeSecret;

use crate::error::AppError;
use crate::state::AppState;

/// Extractor that rejects requests without the configured bearer token.
///
/// Add as the first handler argument to protect a route:
///
/// ```rust,ignore
/// pub async fn list_products(
///     _auth: RequireAdminAuth,
///     State(state): State<AppState>,
/// ) -> Result<Json<Vec<Product>>> { ... }
/// ```
pub struct RequireAdminAuth;

impl FromRequestParts<AppState> for RequireAdminAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let presented = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))?;

        let expected = state.config().api_token.expose_secret();
        if !constant_time_compare(presented, expected) {
            return Err(AppError::Unauthorized("invalid bearer token".to_string()));
        }

        Ok(Self)
    }
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("token-a", "token-a"));
        assert!(!constant_time_compare("token-a", "token-b"));
        assert!(!constant_time_compare("token-a", "token-ab"));
        assert!(constant_time_compare("", ""));
    }
}
