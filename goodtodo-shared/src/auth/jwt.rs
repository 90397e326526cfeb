/// JWT token issuing and validation
///
/// Tokens are signed with HS256 using a shared secret. Both token kinds carry
/// the same identity claims (user, tenant, email, role) and differ in lifetime
/// and in their `token_type` claim:
///
/// - **Access** tokens (15 minutes by default) authenticate API requests.
/// - **Refresh** tokens (7 days by default) can only be exchanged for a new pair.
///
/// Validation pins the algorithm to HS256, so a token carrying any other `alg`
/// header (including `none`) is rejected.
///
/// # Example
///
/// ```
/// use goodtodo_shared::auth::jwt::JwtService;
/// use goodtodo_shared::models::UserRole;
/// use uuid::Uuid;
///
/// let service = JwtService::new("a-secret-that-is-at-least-32-bytes-long");
/// let (user, tenant) = (Uuid::new_v4(), Uuid::new_v4());
/// let token = service
///     .issue_access(user, tenant, "alice@example.com", UserRole::Admin)
///     .unwrap();
///
/// let claims = service.validate_access(&token).unwrap();
/// assert_eq!(claims.sub, user);
/// assert_eq!(claims.tenant_id, tenant);
/// ```
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::UserRole;

/// Issuer claim written into and required from every token
pub const ISSUER: &str = "good-todo";

/// Default access token lifetime
pub const DEFAULT_ACCESS_TTL_MINUTES: i64 = 15;

/// Default refresh token lifetime
pub const DEFAULT_REFRESH_TTL_DAYS: i64 = 7;

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Failed to create token: {0}")]
    CreateError(String),

    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    #[error("Token has expired")]
    Expired,

    #[error("Expected {expected} token, got {actual}")]
    WrongTokenType {
        expected: &'static str,
        actual: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

/// Identity claims carried by access and refresh tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,

    pub tenant_id: Uuid,

    pub email: String,

    pub role: UserRole,

    pub token_type: TokenType,

    pub iss: String,

    pub iat: i64,

    pub exp: i64,

    pub nbf: i64,
}

/// Issues and validates tokens with a fixed secret and lifetimes
#[derive(Clone)]
pub struct JwtService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    /// Creates a service with the default lifetimes
    pub fn new(secret: &str) -> Self {
        Self::with_ttls(
            secret,
            Duration::minutes(DEFAULT_ACCESS_TTL_MINUTES),
            Duration::days(DEFAULT_REFRESH_TTL_DAYS),
        )
    }

    pub fn with_ttls(secret: &str, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn issue_access(
        &self,
        user_id: Uuid,
        tenant_id: Uuid,
        email: &str,
        role: UserRole,
    ) -> Result<String, JwtError> {
        self.issue(user_id, tenant_id, email, role, TokenType::Access)
    }

    pub fn issue_refresh(
        &self,
        user_id: Uuid,
        tenant_id: Uuid,
        email: &str,
        role: UserRole,
    ) -> Result<String, JwtError> {
        self.issue(user_id, tenant_id, email, role, TokenType::Refresh)
    }

    fn issue(
        &self,
        user_id: Uuid,
        tenant_id: Uuid,
        email: &str,
        role: UserRole,
        token_type: TokenType,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let ttl = match token_type {
            TokenType::Access => self.access_ttl,
            TokenType::Refresh => self.refresh_ttl,
        };

        let claims = Claims {
            sub: user_id,
            tenant_id,
            email: email.to_string(),
            role,
            token_type,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            nbf: now.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
    }

    /// Validates signature, algorithm, issuer and expiry of a token of either kind
    pub fn validate(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
            })
    }

    /// Validates a token and requires it to be an access token
    pub fn validate_access(&self, token: &str) -> Result<Claims, JwtError> {
        self.validate_kind(token, TokenType::Access)
    }

    /// Validates a token and requires it to be a refresh token
    pub fn validate_refresh(&self, token: &str) -> Result<Claims, JwtError> {
        self.validate_kind(token, TokenType::Refresh)
    }

    fn validate_kind(&self, token: &str, expected: TokenType) -> Result<Claims, JwtError> {
        let claims = self.validate(token)?;
        if claims.token_type != expected {
            return Err(JwtError::WrongTokenType {
                expected: expected.as_str(),
                actual: claims.token_type.as_str(),
            });
        }
        Ok(claims)
    }
}
