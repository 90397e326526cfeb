/// User model
///
/// Users belong to a single tenant; `(tenant_id, email)` is unique. The first
/// user of a tenant is its admin. New users start unverified with a one-time
/// verification token that expires after [`VERIFICATION_TOKEN_TTL_HOURS`].
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// Lifetime of an email verification token
pub const VERIFICATION_TOKEN_TTL_HOURS: i64 = 24;

/// Role of a user within its tenant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Member,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Member => "member",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown user role: {0}")]
pub struct UnknownRole(pub String);

impl std::str::FromStr for UserRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "member" => Ok(UserRole::Member),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

impl TryFrom<String> for UserRole {
    type Error = UnknownRole;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// User record
///
/// `password_hash` and the verification token are never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,

    pub tenant_id: Uuid,

    pub email: String,

    #[serde(skip_serializing)]
    pub password_hash: String,

    pub name: String,

    #[sqlx(try_from = "String")]
    pub role: UserRole,

    pub email_verified: bool,

    #[serde(skip_serializing)]
    pub verification_token: Option<String>,

    #[serde(skip_serializing)]
    pub verification_token_expires_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Input for creating a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: UserRole,
    pub verification_token: Option<String>,
    pub verification_token_expires_at: Option<DateTime<Utc>>,
}

impl User {
    /// Whether the verification token expiry has passed at `now`
    pub fn verification_expired(&self, now: DateTime<Utc>) -> bool {
        self.verification_token_expires_at
            .map(|expires_at| expires_at < now)
            .unwrap_or(false)
    }

    /// Marks the email as verified and consumes the token
    pub fn mark_verified(&mut self) {
        self.email_verified = true;
        self.verification_token = None;
        self.verification_token_expires_at = None;
    }

    /// Inserts a new, unverified user
    pub async fn insert<'e, E>(executor: E, data: &NewUser) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, tenant_id, email, password_hash, name, role,
                               email_verified, verification_token, verification_token_expires_at)
            VALUES ($1, $2, $3, $4, $5, $6, FALSE, $7, $8)
            RETURNING id, tenant_id, email, password_hash, name, role, email_verified,
                      verification_token, verification_token_expires_at, created_at, updated_at
            "#,
        )
        .bind(data.id)
        .bind(data.tenant_id)
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(&data.name)
        .bind(data.role.as_str())
        .bind(&data.verification_token)
        .bind(data.verification_token_expires_at)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id<'e, E>(
        executor: E,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, tenant_id, email, password_hash, name, role, email_verified,
                   verification_token, verification_token_expires_at, created_at, updated_at
            FROM users
            WHERE tenant_id = $1 AND id = $2
            "#,
        )
        .bind(tenant_id)
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    pub async fn find_by_email<'e, E>(
        executor: E,
        tenant_id: Uuid,
        email: &str,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, tenant_id, email, password_hash, name, role, email_verified,
                   verification_token, verification_token_expires_at, created_at, updated_at
            FROM users
            WHERE tenant_id = $1 AND email = $2
            "#,
        )
        .bind(tenant_id)
        .bind(email)
        .fetch_optional(executor)
        .await
    }

    /// Looks a user up by verification token across all tenants
    ///
    /// Must run without a tenant context; the users RLS policy admits every
    /// row when `app.current_tenant_id` is unset.
    pub async fn find_by_verification_token<'e, E>(
        executor: E,
        token: &str,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, tenant_id, email, password_hash, name, role, email_verified,
                   verification_token, verification_token_expires_at, created_at, updated_at
            FROM users
            WHERE verification_token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(executor)
        .await
    }

    /// Persists the mutable fields of a user
    ///
    /// `tenant_id`, `email` and `role` are never written.
    pub async fn update<'e, E>(executor: E, user: &User) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $3,
                email_verified = $4,
                verification_token = $5,
                verification_token_expires_at = $6,
                updated_at = NOW()
            WHERE tenant_id = $1 AND id = $2
            RETURNING id, tenant_id, email, password_hash, name, role, email_verified,
                      verification_token, verification_token_expires_at, created_at, updated_at
            "#,
        )
        .bind(user.tenant_id)
        .bind(user.id)
        .bind(&user.name)
        .bind(user.email_verified)
        .bind(&user.verification_token)
        .bind(user.verification_token_expires_at)
        .fetch_optional(executor)
        .await
    }
}
