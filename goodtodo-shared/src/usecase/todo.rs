//! Todo use cases
//!
//! Reads of a single todo always happen before the ownership check, so a todo
//! from another tenant (invisible) reports `TodoNotFound` while a visible todo
//! owned by someone else reports `NotTodoOwner`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::error::{UseCaseError, UseCaseResult};
use crate::auth::Principal;
use crate::id::IdGenerator;
use crate::models::{NewTodo, Todo};
use crate::repository::TodoRepository;

#[derive(Debug, Clone)]
pub struct CreateTodoInput {
    pub title: String,
    pub description: String,
    pub is_public: bool,
    pub due_date: Option<DateTime<Utc>>,
}

/// Full replacement of a todo's mutable fields
#[derive(Debug, Clone)]
pub struct UpdateTodoInput {
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub is_public: bool,
    pub due_date: Option<DateTime<Utc>>,
}

pub struct TodoInteractor {
    todos: Arc<dyn TodoRepository>,
    ids: Arc<dyn IdGenerator>,
}

impl TodoInteractor {
    pub fn new(todos: Arc<dyn TodoRepository>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { todos, ids }
    }

    /// The principal's own todos, newest first
    pub async fn list(&self, principal: &Principal) -> UseCaseResult<Vec<Todo>> {
        Ok(self
            .todos
            .list_by_user(principal.tenant_id, principal.user_id)
            .await?)
    }

    /// Public todos of the principal's tenant, newest first
    pub async fn list_public(&self, principal: &Principal) -> UseCaseResult<Vec<Todo>> {
        Ok(self.todos.list_public(principal.tenant_id).await?)
    }

    pub async fn create(&self, principal: &Principal, input: CreateTodoInput) -> UseCaseResult<Todo> {
        let todo = self
            .todos
            .create(NewTodo {
                id: self.ids.generate(),
                tenant_id: principal.tenant_id,
                user_id: principal.user_id,
                title: input.title,
                description: input.description,
                is_public: input.is_public,
                due_date: input.due_date,
            })
            .await?;

        tracing::info!(todo_id = %todo.id, user_id = %todo.user_id, "Todo created");
        Ok(todo)
    }

    pub async fn update(
        &self,
        principal: &Principal,
        todo_id: Uuid,
        input: UpdateTodoInput,
    ) -> UseCaseResult<Todo> {
        let mut todo = self.owned_todo(principal, todo_id).await?;

        todo.title = input.title;
        todo.description = input.description;
        todo.is_public = input.is_public;
        todo.due_date = input.due_date;
        todo.set_completed(input.completed, Utc::now());

        let updated = self
            .todos
            .update(&todo)
            .await?
            .ok_or(UseCaseError::TodoNotFound)?;

        tracing::info!(todo_id = %updated.id, completed = updated.completed, "Todo updated");
        Ok(updated)
    }

    pub async fn delete(&self, principal: &Principal, todo_id: Uuid) -> UseCaseResult<()> {
        self.owned_todo(principal, todo_id).await?;

        if !self.todos.delete(principal.tenant_id, todo_id).await? {
            return Err(UseCaseError::TodoNotFound);
        }

        tracing::info!(todo_id = %todo_id, "Todo deleted");
        Ok(())
    }

    async fn owned_todo(&self, principal: &Principal, todo_id: Uuid) -> UseCaseResult<Todo> {
        let todo = self
            .todos
            .find_by_id(principal.tenant_id, todo_id)
            .await?
            .ok_or(UseCaseError::TodoNotFound)?;

        if todo.user_id != principal.user_id {
            return Err(UseCaseError::NotTodoOwner);
        }

        Ok(todo)
    }
}
