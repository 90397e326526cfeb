/// Authentication endpoints
///
/// - `POST /api/v1/auth/register`: new tenant and admin user, verification mail
/// - `POST /api/v1/auth/login`: tenant slug + credentials to a token pair
/// - `POST /api/v1/auth/verify-email`: consume a verification token
/// - `POST /api/v1/auth/refresh`: exchange a refresh token for a new pair
use crate::{
    app::AppState,
    error::{validate_request, ApiError, ApiResult},
    extract::ApiJson,
    routes::users::UserResponse,
};
use axum::{extract::State, http::StatusCode, Json};
use goodtodo_shared::usecase::{
    LoginInput, RefreshOutput, RegisterInput, RegisterOutput, UseCaseError, VerifyEmailOutput,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Tenant slug is required"))]
    pub tenant_slug: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserResponse,
}

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyEmailRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterOutput>)> {
    validate_request(&req)?;

    let out = state
        .auth
        .register(RegisterInput {
            email: req.email,
            password: req.password,
            name: req.name,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(out)))
}

/// Resolves the tenant by slug, then authenticates within it
///
/// An unknown slug is reported exactly like a wrong password.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    validate_request(&req)?;

    let tenant = state
        .tenants
        .find_by_slug(&req.tenant_slug)
        .await
        .map_err(UseCaseError::from)?
        .ok_or(UseCaseError::InvalidCredentials)?;

    let out = state
        .auth
        .login_with_tenant(
            tenant.id,
            LoginInput {
                email: req.email,
                password: req.password,
            },
        )
        .await?;

    Ok(Json(LoginResponse {
        access_token: out.access_token,
        refresh_token: out.refresh_token,
        user: out.user.into(),
    }))
}

pub async fn verify_email(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<VerifyEmailRequest>,
) -> ApiResult<Json<VerifyEmailOutput>> {
    validate_request(&req)?;
    Ok(Json(state.auth.verify_email(&req.token).await?))
}

/// A rejected refresh token is a 401 here, unlike the 400 of email verification
pub async fn refresh(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RefreshRequest>,
) -> ApiResult<Json<RefreshOutput>> {
    validate_request(&req)?;

    match state.auth.refresh_token(&req.refresh_token).await {
        Ok(out) => Ok(Json(out)),
        Err(UseCaseError::InvalidToken) => {
            Err(ApiError::Unauthorized("invalid refresh token".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}
