//! Authentication extractors.
//!
//! The platform sits behind a gateway that terminates merchant sessions and
//! injects the authenticated merchant id as a header. Admin routes carry a
//! shared bearer-style token header instead.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
};

use storelane_core::MerchantId;

use crate::error::AppError;
use crate::state::AppState;

/// Header set by the auth gateway with the authenticated merchant's id.
pub const MERCHANT_ID_HEADER: &str = "x-merchant-id";

/// Header carrying the admin console token.
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Extractor requiring an authenticated merchant.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireMerchant(merchant_id): RequireMerchant) -> impl IntoResponse {
///     format!("merchant {merchant_id}")
/// }
/// ```
pub struct RequireMerchant(pub MerchantId);

impl<S> FromRequestParts<S> for RequireMerchant
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(MERCHANT_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("missing merchant identity".to_string()))?;

        let merchant_id = header
            .parse::<MerchantId>()
            .map_err(|_| AppError::Unauthorized("malformed merchant identity".to_string()))?;

        Ok(Self(merchant_id))
    }
}

/// Extractor requiring the admin console token.
pub struct RequireAdminToken;

impl FromRequestParts<AppState> for RequireAdminToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let presented = parts
            .headers
            .get(ADMIN_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("missing admin token".to_string()))?;

        if !state.config().admin_token_matches(presented) {
            return Err(AppError::Forbidden("invalid admin token".to_string()));
        }

        Ok(Self)
    }
}
