/// PostgreSQL repositories
///
/// User and todo calls open a tenant-scoped transaction, run their statement
/// and commit. Queries also filter on `tenant_id` explicitly, so isolation does
/// not depend on RLS alone.
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{RepositoryResult, TenantRepository, TodoRepository, UserRepository};
use crate::db::begin_tenant_scope;
use crate::models::{NewTenant, NewTodo, NewUser, Tenant, Todo, User};

#[derive(Debug, Clone)]
pub struct PgTenantRepository {
    pool: PgPool,
}

impl PgTenantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TenantRepository for PgTenantRepository {
    async fn create(&self, tenant: NewTenant) -> RepositoryResult<Tenant> {
        Ok(Tenant::insert(&self.pool, &tenant).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Tenant>> {
        Ok(Tenant::find_by_id(&self.pool, id).await?)
    }

    async fn find_by_slug(&self, slug: &str) -> RepositoryResult<Option<Tenant>> {
        Ok(Tenant::find_by_slug(&self.pool, slug).await?)
    }
}

#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: NewUser) -> RepositoryResult<User> {
        let mut tx = begin_tenant_scope(&self.pool, user.tenant_id).await?;
        let created = User::insert(&mut *tx, &user).await?;
        tx.commit().await?;
        Ok(created)
    }

    async fn find_by_id(&self, tenant_id: Uuid, id: Uuid) -> RepositoryResult<Option<User>> {
        let mut tx = begin_tenant_scope(&self.pool, tenant_id).await?;
        let user = User::find_by_id(&mut *tx, tenant_id, id).await?;
        tx.commit().await?;
        Ok(user)
    }

    async fn find_by_email(&self, tenant_id: Uuid, email: &str) -> RepositoryResult<Option<User>> {
        let mut tx = begin_tenant_scope(&self.pool, tenant_id).await?;
        let user = User::find_by_email(&mut *tx, tenant_id, email).await?;
        tx.commit().await?;
        Ok(user)
    }

    async fn find_by_verification_token(&self, token: &str) -> RepositoryResult<Option<User>> {
        Ok(User::find_by_verification_token(&self.pool, token).await?)
    }

    async fn update(&self, user: &User) -> RepositoryResult<Option<User>> {
        let mut tx = begin_tenant_scope(&self.pool, user.tenant_id).await?;
        let updated = User::update(&mut *tx, user).await?;
        tx.commit().await?;
        Ok(updated)
    }
}

#[derive(Debug, Clone)]
pub struct PgTodoRepository {
    pool: PgPool,
}

impl PgTodoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoRepository for PgTodoRepository {
    async fn create(&self, todo: NewTodo) -> RepositoryResult<Todo> {
        let mut tx = begin_tenant_scope(&self.pool, todo.tenant_id).await?;
        let created = Todo::insert(&mut *tx, &todo).await?;
        tx.commit().await?;
        Ok(created)
    }

    async fn find_by_id(&self, tenant_id: Uuid, id: Uuid) -> RepositoryResult<Option<Todo>> {
        let mut tx = begin_tenant_scope(&self.pool, tenant_id).await?;
        let todo = Todo::find_by_id(&mut *tx, tenant_id, id).await?;
        tx.commit().await?;
        Ok(todo)
    }

    async fn list_by_user(&self, tenant_id: Uuid, user_id: Uuid) -> RepositoryResult<Vec<Todo>> {
        let mut tx = begin_tenant_scope(&self.pool, tenant_id).await?;
        let todos = Todo::list_by_user(&mut *tx, tenant_id, user_id).await?;
        tx.commit().await?;
        Ok(todos)
    }

    async fn list_public(&self, tenant_id: Uuid) -> RepositoryResult<Vec<Todo>> {
        let mut tx = begin_tenant_scope(&self.pool, tenant_id).await?;
        let todos = Todo::list_public(&mut *tx, tenant_id).await?;
        tx.commit().await?;
        Ok(todos)
    }

    async fn update(&self, todo: &Todo) -> RepositoryResult<Option<Todo>> {
        let mut tx = begin_tenant_scope(&self.pool, todo.tenant_id).await?;
        let updated = Todo::update(&mut *tx, todo).await?;
        tx.commit().await?;
        Ok(updated)
    }

    async fn delete(&self, tenant_id: Uuid, id: Uuid) -> RepositoryResult<bool> {
        let mut tx = begin_tenant_scope(&self.pool, tenant_id).await?;
        let deleted = Todo::delete(&mut *tx, tenant_id, id).await?;
        tx.commit().await?;
        Ok(deleted)
    }
}
