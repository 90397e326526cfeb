/// Tenant-scoped transactions
///
/// Row-level security on `users` and `todos` filters on the
/// `app.current_tenant_id` setting. It is set with `set_config(.., true)`, which
/// lasts only until the transaction ends, so a pooled connection never carries
/// one request's tenant into the next.
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;
use uuid::Uuid;

/// Name of the session setting read by the RLS policies
pub const TENANT_SETTING: &str = "app.current_tenant_id";

/// Begins a transaction with the tenant context set
///
/// The caller must commit for writes to persist; dropping the transaction
/// rolls back.
pub async fn begin_tenant_scope(
    pool: &PgPool,
    tenant_id: Uuid,
) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("SELECT set_config($1, $2, true)")
        .bind(TENANT_SETTING)
        .bind(tenant_id.to_string())
        .execute(&mut *tx)
        .await?;

    debug!(tenant_id = %tenant_id, "Tenant scope opened");
    Ok(tx)
}
