/// Bearer token authentication
///
/// [`authenticate`] turns an `Authorization: Bearer <token>` header into a
/// [`Principal`]. The API crate wraps it in an axum middleware layer that
/// inserts the principal into request extensions for handlers to read.
use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::{Claims, JwtError, JwtService};
use crate::models::UserRole;

/// Authenticated identity handed to every protected interactor call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            tenant_id: claims.tenant_id,
            email: claims.email,
            role: claims.role,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingCredentials,

    #[error("Invalid authorization header format")]
    InvalidFormat,

    #[error("Invalid or expired token")]
    InvalidToken(#[source] JwtError),
}

/// Extracts and validates the bearer access token from request headers
pub fn authenticate(headers: &HeaderMap, tokens: &JwtService) -> Result<Principal, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::InvalidFormat)?;

    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::InvalidFormat)?;

    let claims = tokens.validate_access(token).map_err(AuthError::InvalidToken)?;
    Ok(Principal::from(claims))
}
