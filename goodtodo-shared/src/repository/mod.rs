/// Persistence ports
///
/// Interactors depend on these traits only. Two implementations exist:
///
/// - [`postgres`]: PostgreSQL, every tenant-scoped call inside a transaction
///   carrying the RLS tenant context
/// - [`memory`]: in-process store with the same tenant filtering, used by tests
///
/// Every user/todo lookup takes the tenant id explicitly, except
/// [`UserRepository::find_by_verification_token`], which runs before any
/// tenant is known.
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{NewTenant, NewTodo, NewUser, Tenant, Todo, User};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::{PgTenantRepository, PgTodoRepository, PgUserRepository};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// A unique constraint rejected the write; carries the constraint name
    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                let constraint = db_err.constraint().unwrap_or("unknown").to_string();
                return RepositoryError::Conflict(constraint);
            }
        }
        RepositoryError::Database(err)
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[async_trait]
pub trait TenantRepository: Send + Sync {
    async fn create(&self, tenant: NewTenant) -> RepositoryResult<Tenant>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Tenant>>;

    async fn find_by_slug(&self, slug: &str) -> RepositoryResult<Option<Tenant>>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: NewUser) -> RepositoryResult<User>;

    async fn find_by_id(&self, tenant_id: Uuid, id: Uuid) -> RepositoryResult<Option<User>>;

    async fn find_by_email(&self, tenant_id: Uuid, email: &str) -> RepositoryResult<Option<User>>;

    /// Cross-tenant lookup used by email verification
    async fn find_by_verification_token(&self, token: &str) -> RepositoryResult<Option<User>>;

    /// Writes name, verification state and token fields; `None` if the user is gone
    async fn update(&self, user: &User) -> RepositoryResult<Option<User>>;
}

#[async_trait]
pub trait TodoRepository: Send + Sync {
    async fn create(&self, todo: NewTodo) -> RepositoryResult<Todo>;

    async fn find_by_id(&self, tenant_id: Uuid, id: Uuid) -> RepositoryResult<Option<Todo>>;

    /// The user's todos, newest first
    async fn list_by_user(&self, tenant_id: Uuid, user_id: Uuid) -> RepositoryResult<Vec<Todo>>;

    /// The tenant's public todos, newest first
    async fn list_public(&self, tenant_id: Uuid) -> RepositoryResult<Vec<Todo>>;

    async fn update(&self, todo: &Todo) -> RepositoryResult<Option<Todo>>;

    async fn delete(&self, tenant_id: Uuid, id: Uuid) -> RepositoryResult<bool>;
}
