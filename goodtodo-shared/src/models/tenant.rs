/// Tenant model
///
/// A tenant is an isolated namespace created at registration time. Every user
/// and todo belongs to exactly one tenant. Tenants have no update path.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// Tenant record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tenant {
    pub id: Uuid,

    /// Display name (the registering user's name)
    pub name: String,

    /// Globally unique, human-typable identifier used at login
    pub slug: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Input for creating a tenant
#[derive(Debug, Clone)]
pub struct NewTenant {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

impl NewTenant {
    /// Builds a tenant whose slug is derived from the owner's email
    pub fn for_owner(id: Uuid, name: impl Into<String>, owner_email: &str) -> Self {
        Self {
            id,
            name: name.into(),
            slug: Tenant::slug_for(owner_email, id),
        }
    }
}

impl Tenant {
    /// Derives a tenant slug: the email local part, a dash, and the first
    /// eight hex characters of the tenant id.
    ///
    /// ```
    /// # use goodtodo_shared::models::tenant::Tenant;
    /// # use uuid::Uuid;
    /// let id = Uuid::parse_str("0123abcd-0000-4000-8000-000000000000").unwrap();
    /// assert_eq!(Tenant::slug_for("alice@example.com", id), "alice-0123abcd");
    /// ```
    pub fn slug_for(email: &str, tenant_id: Uuid) -> String {
        let local = email.split('@').next().unwrap_or_default();
        let id = tenant_id.simple().to_string();
        format!("{}-{}", local, &id[..8])
    }

    pub async fn insert<'e, E>(executor: E, data: &NewTenant) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Tenant>(
            r#"
            INSERT INTO tenants (id, name, slug)
            VALUES ($1, $2, $3)
            RETURNING id, name, slug, created_at, updated_at
            "#,
        )
        .bind(data.id)
        .bind(&data.name)
        .bind(&data.slug)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Tenant>(
            r#"
            SELECT id, name, slug, created_at, updated_at
            FROM tenants
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Finds a tenant by its slug (case-sensitive)
    pub async fn find_by_slug<'e, E>(executor: E, slug: &str) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Tenant>(
            r#"
            SELECT id, name, slug, created_at, updated_at
            FROM tenants
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(executor)
        .await
    }
}
