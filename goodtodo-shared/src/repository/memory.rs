/// In-memory repositories
///
/// [`MemoryStore`] implements all three repository traits over a single
/// lock-protected state. Lookups filter on the tenant id the same way the
/// PostgreSQL policies do, and the unique constraints of the schema
/// (`tenants.slug`, `users(tenant_id, email)`) are enforced as
/// [`RepositoryError::Conflict`].
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{RepositoryError, RepositoryResult, TenantRepository, TodoRepository, UserRepository};
use crate::models::{NewTenant, NewTodo, NewUser, Tenant, Todo, User};

#[derive(Debug, Default)]
struct State {
    tenants: HashMap<Uuid, Tenant>,
    users: HashMap<Uuid, User>,
    /// Insertion order is kept so equal timestamps still sort newest first
    todos: Vec<Todo>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<'a>(todos: impl DoubleEndedIterator<Item = &'a Todo>) -> Vec<Todo> {
    let mut out: Vec<Todo> = todos.rev().cloned().collect();
    out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    out
}

#[async_trait]
impl TenantRepository for MemoryStore {
    async fn create(&self, tenant: NewTenant) -> RepositoryResult<Tenant> {
        let mut state = self.state.write().await;
        if state.tenants.contains_key(&tenant.id) {
            return Err(RepositoryError::Conflict("tenants_pkey".to_string()));
        }
        if state.tenants.values().any(|t| t.slug == tenant.slug) {
            return Err(RepositoryError::Conflict("tenants_slug_key".to_string()));
        }

        let now = Utc::now();
        let created = Tenant {
            id: tenant.id,
            name: tenant.name,
            slug: tenant.slug,
            created_at: now,
            updated_at: now,
        };
        state.tenants.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Tenant>> {
        Ok(self.state.read().await.tenants.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> RepositoryResult<Option<Tenant>> {
        let state = self.state.read().await;
        Ok(state.tenants.values().find(|t| t.slug == slug).cloned())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: NewUser) -> RepositoryResult<User> {
        let mut state = self.state.write().await;
        if state.users.contains_key(&user.id) {
            return Err(RepositoryError::Conflict("users_pkey".to_string()));
        }
        if state
            .users
            .values()
            .any(|u| u.tenant_id == user.tenant_id && u.email == user.email)
        {
            return Err(RepositoryError::Conflict("users_tenant_email_key".to_string()));
        }

        let now = Utc::now();
        let created = User {
            id: user.id,
            tenant_id: user.tenant_id,
            email: user.email,
            password_hash: user.password_hash,
            name: user.name,
            role: user.role,
            email_verified: false,
            verification_token: user.verification_token,
            verification_token_expires_at: user.verification_token_expires_at,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, tenant_id: Uuid, id: Uuid) -> RepositoryResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .get(&id)
            .filter(|u| u.tenant_id == tenant_id)
            .cloned())
    }

    async fn find_by_email(&self, tenant_id: Uuid, email: &str) -> RepositoryResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.tenant_id == tenant_id && u.email == email)
            .cloned())
    }

    async fn find_by_verification_token(&self, token: &str) -> RepositoryResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.verification_token.as_deref() == Some(token))
            .cloned())
    }

    async fn update(&self, user: &User) -> RepositoryResult<Option<User>> {
        let mut state = self.state.write().await;
        let Some(stored) = state
            .users
            .get_mut(&user.id)
            .filter(|u| u.tenant_id == user.tenant_id)
        else {
            return Ok(None);
        };

        stored.name = user.name.clone();
        stored.email_verified = user.email_verified;
        stored.verification_token = user.verification_token.clone();
        stored.verification_token_expires_at = user.verification_token_expires_at;
        stored.updated_at = Utc::now();
        Ok(Some(stored.clone()))
    }
}

#[async_trait]
impl TodoRepository for MemoryStore {
    async fn create(&self, todo: NewTodo) -> RepositoryResult<Todo> {
        let mut state = self.state.write().await;
        if state.todos.iter().any(|t| t.id == todo.id) {
            return Err(RepositoryError::Conflict("todos_pkey".to_string()));
        }

        let now = Utc::now();
        let created = Todo {
            id: todo.id,
            tenant_id: todo.tenant_id,
            user_id: todo.user_id,
            title: todo.title,
            description: todo.description,
            completed: false,
            is_public: todo.is_public,
            due_date: todo.due_date,
            completed_at: None,
            created_at: now,
            updated_at: now,
        };
        state.todos.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, tenant_id: Uuid, id: Uuid) -> RepositoryResult<Option<Todo>> {
        let state = self.state.read().await;
        Ok(state
            .todos
            .iter()
            .find(|t| t.tenant_id == tenant_id && t.id == id)
            .cloned())
    }

    async fn list_by_user(&self, tenant_id: Uuid, user_id: Uuid) -> RepositoryResult<Vec<Todo>> {
        let state = self.state.read().await;
        Ok(newest_first(
            state
                .todos
                .iter()
                .filter(|t| t.tenant_id == tenant_id && t.user_id == user_id),
        ))
    }

    async fn list_public(&self, tenant_id: Uuid) -> RepositoryResult<Vec<Todo>> {
        let state = self.state.read().await;
        Ok(newest_first(
            state
                .todos
                .iter()
                .filter(|t| t.tenant_id == tenant_id && t.is_public),
        ))
    }

    async fn update(&self, todo: &Todo) -> RepositoryResult<Option<Todo>> {
        let mut state = self.state.write().await;
        let Some(stored) = state
            .todos
            .iter_mut()
            .find(|t| t.tenant_id == todo.tenant_id && t.id == todo.id)
        else {
            return Ok(None);
        };

        stored.title = todo.title.clone();
        stored.description = todo.description.clone();
        stored.completed = todo.completed;
        stored.is_public = todo.is_public;
        stored.due_date = todo.due_date;
        stored.completed_at = todo.completed_at;
        stored.updated_at = Utc::now();
        Ok(Some(stored.clone()))
    }

    async fn delete(&self, tenant_id: Uuid, id: Uuid) -> RepositoryResult<bool> {
        let mut state = self.state.write().await;
        let before = state.todos.len();
        state.todos.retain(|t| !(t.tenant_id == tenant_id && t.id == id));
        Ok(state.todos.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;

    fn new_todo(tenant_id: Uuid, user_id: Uuid, title: &str, is_public: bool) -> NewTodo {
        NewTodo {
            id: Uuid::new_v4(),
            tenant_id,
            user_id,
            title: title.to_string(),
            description: String::new(),
            is_public,
            due_date: None,
        }
    }

    fn new_user(tenant_id: Uuid, email: &str) -> NewUser {
        NewUser {
            id: Uuid::new_v4(),
            tenant_id,
            email: email.to_string(),
            password_hash: "hash".to_string(),
            name: "User".to_string(),
            role: UserRole::Member,
            verification_token: None,
            verification_token_expires_at: None,
        }
    }

    #[tokio::test]
    async fn test_slug_must_be_unique() {
        let store = MemoryStore::new();
        let first = NewTenant {
            id: Uuid::new_v4(),
            name: "A".to_string(),
            slug: "same".to_string(),
        };
        let second = NewTenant {
            id: Uuid::new_v4(),
            ..first.clone()
        };

        TenantRepository::create(&store, first).await.unwrap();
        let err = TenantRepository::create(&store, second).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_email_unique_per_tenant_only() {
        let store = MemoryStore::new();
        let (t1, t2) = (Uuid::new_v4(), Uuid::new_v4());

        UserRepository::create(&store, new_user(t1, "a@x.io")).await.unwrap();
        UserRepository::create(&store, new_user(t2, "a@x.io")).await.unwrap();
        let err = UserRepository::create(&store, new_user(t1, "a@x.io"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(c) if c == "users_tenant_email_key"));
    }

    #[tokio::test]
    async fn test_rows_are_invisible_across_tenants() {
        let store = MemoryStore::new();
        let (t1, t2) = (Uuid::new_v4(), Uuid::new_v4());
        let user = UserRepository::create(&store, new_user(t1, "a@x.io")).await.unwrap();
        let todo = TodoRepository::create(&store, new_todo(t1, user.id, "secret", true))
            .await
            .unwrap();

        assert!(UserRepository::find_by_id(&store, t2, user.id).await.unwrap().is_none());
        assert!(TodoRepository::find_by_id(&store, t2, todo.id).await.unwrap().is_none());
        assert!(store.list_public(t2).await.unwrap().is_empty());
        assert!(!TodoRepository::delete(&store, t2, todo.id).await.unwrap());

        let mut foreign = todo.clone();
        foreign.tenant_id = t2;
        assert!(TodoRepository::update(&store, &foreign).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_lists_are_newest_first() {
        let store = MemoryStore::new();
        let tenant = Uuid::new_v4();
        let user = Uuid::new_v4();
        for title in ["first", "second", "third"] {
            TodoRepository::create(&store, new_todo(tenant, user, title, title != "second"))
                .await
                .unwrap();
        }

        let titles: Vec<_> = store
            .list_by_user(tenant, user)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["third", "second", "first"]);

        let public: Vec<_> = store
            .list_public(tenant)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(public, vec!["third", "first"]);
    }
}
