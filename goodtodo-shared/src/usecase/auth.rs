//! Authentication use cases
//!
//! A user moves from unverified to verified exactly once, by presenting the
//! token mailed at registration. Login requires a verified user; refresh only
//! needs a valid refresh token.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::error::{UseCaseError, UseCaseResult};
use crate::auth::{JwtService, PasswordService};
use crate::id::IdGenerator;
use crate::models::user::VERIFICATION_TOKEN_TTL_HOURS;
use crate::models::{NewTenant, NewUser, User, UserRole};
use crate::notification::{NotificationSender, VerificationTemplate};
use crate::repository::{RepositoryError, TenantRepository, UserRepository};

pub const REGISTRATION_MESSAGE: &str =
    "Registration successful. Please check your email to verify your account.";
pub const VERIFIED_MESSAGE: &str = "Email verified successfully";

#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterOutput {
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct LoginOutput {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyEmailOutput {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshOutput {
    pub access_token: String,
    pub refresh_token: String,
}

pub struct AuthInteractor {
    tenants: Arc<dyn TenantRepository>,
    users: Arc<dyn UserRepository>,
    tokens: Arc<JwtService>,
    passwords: Arc<PasswordService>,
    ids: Arc<dyn IdGenerator>,
    notifier: Arc<dyn NotificationSender>,
    template: VerificationTemplate,
}

fn conflict_as_exists(err: RepositoryError) -> UseCaseError {
    match err {
        RepositoryError::Conflict(_) => UseCaseError::UserAlreadyExists,
        other => UseCaseError::Repository(other),
    }
}

impl AuthInteractor {
    pub fn new(
        tenants: Arc<dyn TenantRepository>,
        users: Arc<dyn UserRepository>,
        tokens: Arc<JwtService>,
        passwords: Arc<PasswordService>,
        ids: Arc<dyn IdGenerator>,
        notifier: Arc<dyn NotificationSender>,
        template: VerificationTemplate,
    ) -> Self {
        Self {
            tenants,
            users,
            tokens,
            passwords,
            ids,
            notifier,
            template,
        }
    }

    /// Creates a tenant and its admin user, then mails a verification link
    ///
    /// A failed send is logged and does not undo the registration.
    pub async fn register(&self, input: RegisterInput) -> UseCaseResult<RegisterOutput> {
        let tenant_id = self.ids.generate();
        let user_id = self.ids.generate();
        let verification_token = self.ids.generate().to_string();

        let password_hash = self.passwords.hash(&input.password)?;

        let tenant = self
            .tenants
            .create(NewTenant::for_owner(tenant_id, input.name.clone(), &input.email))
            .await
            .map_err(conflict_as_exists)?;

        let user = self
            .users
            .create(NewUser {
                id: user_id,
                tenant_id: tenant.id,
                email: input.email.clone(),
                password_hash,
                name: input.name,
                role: UserRole::Admin,
                verification_token: Some(verification_token.clone()),
                verification_token_expires_at: Some(
                    Utc::now() + Duration::hours(VERIFICATION_TOKEN_TTL_HOURS),
                ),
            })
            .await
            .map_err(conflict_as_exists)?;

        let message = self.template.render(&user.email, &verification_token);
        if let Err(e) = self.notifier.send_verification(&message).await {
            tracing::warn!(user_id = %user.id, error = %e, "Failed to send verification email");
        }

        tracing::info!(
            user_id = %user.id,
            tenant_id = %tenant.id,
            tenant_slug = %tenant.slug,
            "User registered"
        );

        Ok(RegisterOutput {
            user_id: user.id,
            tenant_id: tenant.id,
            email: user.email,
            message: REGISTRATION_MESSAGE.to_string(),
        })
    }

    /// Authenticates a user of a known tenant and issues a token pair
    pub async fn login_with_tenant(
        &self,
        tenant_id: Uuid,
        input: LoginInput,
    ) -> UseCaseResult<LoginOutput> {
        let user = self
            .users
            .find_by_email(tenant_id, &input.email)
            .await?
            .ok_or(UseCaseError::InvalidCredentials)?;

        if !self.passwords.verify(&input.password, &user.password_hash)? {
            return Err(UseCaseError::InvalidCredentials);
        }

        if !user.email_verified {
            return Err(UseCaseError::EmailNotVerified);
        }

        let access_token = self
            .tokens
            .issue_access(user.id, user.tenant_id, &user.email, user.role)?;
        let refresh_token = self
            .tokens
            .issue_refresh(user.id, user.tenant_id, &user.email, user.role)?;

        tracing::info!(user_id = %user.id, tenant_id = %user.tenant_id, "User logged in");

        Ok(LoginOutput {
            access_token,
            refresh_token,
            user,
        })
    }

    /// Consumes a verification token
    pub async fn verify_email(&self, token: &str) -> UseCaseResult<VerifyEmailOutput> {
        if token.is_empty() {
            return Err(UseCaseError::InvalidToken);
        }

        let mut user = self
            .users
            .find_by_verification_token(token)
            .await?
            .ok_or(UseCaseError::InvalidToken)?;

        if user.verification_expired(Utc::now()) {
            return Err(UseCaseError::TokenExpired);
        }

        user.mark_verified();
        self.users
            .update(&user)
            .await?
            .ok_or(UseCaseError::UserNotFound)?;

        tracing::info!(user_id = %user.id, tenant_id = %user.tenant_id, "Email verified");

        Ok(VerifyEmailOutput {
            success: true,
            message: VERIFIED_MESSAGE.to_string(),
        })
    }

    /// Exchanges a refresh token for a new pair carrying the same claims
    ///
    /// The user is not re-read; a token stays usable until it expires.
    pub async fn refresh_token(&self, refresh_token: &str) -> UseCaseResult<RefreshOutput> {
        let claims = self
            .tokens
            .validate_refresh(refresh_token)
            .map_err(|_| UseCaseError::InvalidToken)?;

        let access_token =
            self.tokens
                .issue_access(claims.sub, claims.tenant_id, &claims.email, claims.role)?;
        let refresh_token =
            self.tokens
                .issue_refresh(claims.sub, claims.tenant_id, &claims.email, claims.role)?;

        Ok(RefreshOutput {
            access_token,
            refresh_token,
        })
    }
}
