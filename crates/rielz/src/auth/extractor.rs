use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use super::token::TokenAuthority;
use crate::ids::UserId;
use crate::response::ApiError;

/// Caller identity resolved from an `Authorization: Bearer <token>` header.
///
/// Tokens are verified with the [`TokenAuthority`] installed as a request
/// extension; routes without one reject every protected request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub UserId);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let authority = parts
            .extensions
            .get::<Arc<TokenAuthority>>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthenticated("Authentication not configured".to_string()))?;

        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthenticated("Missing authorization header".to_string()))?;

        let token = header_value
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                ApiError::Unauthenticated("Invalid authorization header format".to_string())
            })?;

        authority
            .verify(token)
            .map(AuthenticatedUser)
            .map_err(|_| ApiError::Unauthenticated("Invalid or expired token".to_string()))
    }
}
