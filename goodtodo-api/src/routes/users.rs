/// Profile endpoints for the authenticated user
use crate::{
    app::AppState,
    error::{validate_request, ApiResult},
    extract::ApiJson,
};
use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use goodtodo_shared::auth::Principal;
use goodtodo_shared::models::{User, UserRole};
use goodtodo_shared::usecase::UpdateMeInput;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            tenant_id: user.tenant_id,
            email: user.email,
            name: user.name,
            role: user.role,
            email_verified: user.email_verified,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMeRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
}

/// GET /api/v1/me
pub async fn get_me(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.users.get_me(&principal).await?;
    Ok(Json(user.into()))
}

/// PUT /api/v1/me
pub async fn update_me(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiJson(req): ApiJson<UpdateMeRequest>,
) -> ApiResult<Json<UserResponse>> {
    validate_request(&req)?;

    let user = state
        .users
        .update_me(&principal, UpdateMeInput { name: req.name })
        .await?;
    Ok(Json(user.into()))
}
