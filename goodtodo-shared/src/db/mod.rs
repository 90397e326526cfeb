/// Database layer
///
/// - `pool`: PostgreSQL connection pool management with health checks
/// - `migrations`: embedded migration runner
/// - `tenant_scope`: transactions carrying the RLS tenant context
///
/// # Example
///
/// ```no_run
/// use goodtodo_shared::db::pool::{create_pool, DatabaseConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         url: std::env::var("DATABASE_URL")?,
///         ..Default::default()
///     };
///
///     let pool = create_pool(config).await?;
///     Ok(())
/// }
/// ```
pub mod migrations;
pub mod pool;
pub mod tenant_scope;

pub use tenant_scope::begin_tenant_scope;
