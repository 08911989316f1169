//! Typed extraction of the bearer token.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tokenvault_core::VaultError;

use crate::error::ApiError;

/// The opaque token carried in `Authorization: Bearer <token>`.
///
/// Missing, non-Bearer, or empty credentials reject with the same generic
/// 401 an expired token gets; the header shape reveals nothing extra.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError(VaultError::Authentication))?;

        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(ApiError(VaultError::Authentication))?;

        Ok(Self(token.to_string()))
    }
}
