/// Todo model
///
/// `tenant_id` and `user_id` are fixed at creation. `completed_at` is set if and
/// only if `completed` is true; the database enforces this with a CHECK
/// constraint and [`Todo::set_completed`] keeps it true in memory.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// Todo record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Todo {
    pub id: Uuid,

    pub tenant_id: Uuid,

    /// Owner
    pub user_id: Uuid,

    pub title: String,

    pub description: String,

    pub completed: bool,

    /// Visible to every user of the tenant
    pub is_public: bool,

    pub due_date: Option<DateTime<Utc>>,

    pub completed_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Input for creating a todo; new todos are never completed
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub is_public: bool,
    pub due_date: Option<DateTime<Utc>>,
}

const TODO_COLUMNS: &str = "id, tenant_id, user_id, title, description, completed, is_public, \
                            due_date, completed_at, created_at, updated_at";

impl Todo {
    /// Sets the completion flag, stamping `completed_at` on the first
    /// transition to completed and clearing it when un-completed.
    pub fn set_completed(&mut self, completed: bool, now: DateTime<Utc>) {
        self.completed = completed;
        if completed {
            if self.completed_at.is_none() {
                self.completed_at = Some(now);
            }
        } else {
            self.completed_at = None;
        }
    }

    pub async fn insert<'e, E>(executor: E, data: &NewTodo) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let sql = format!(
            "INSERT INTO todos (id, tenant_id, user_id, title, description, completed, is_public, due_date)
             VALUES ($1, $2, $3, $4, $5, FALSE, $6, $7)
             RETURNING {TODO_COLUMNS}"
        );

        sqlx::query_as::<_, Todo>(&sql)
            .bind(data.id)
            .bind(data.tenant_id)
            .bind(data.user_id)
            .bind(&data.title)
            .bind(&data.description)
            .bind(data.is_public)
            .bind(data.due_date)
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
        let sql = format!("SELECT {TODO_COLUMNS} FROM todos WHERE tenant_id = $1 AND id = $2");

        sqlx::query_as::<_, Todo>(&sql)
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Lists a user's own todos, newest first
    pub async fn list_by_user<'e, E>(
        executor: E,
        tenant_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let sql = format!(
            "SELECT {TODO_COLUMNS} FROM todos
             WHERE tenant_id = $1 AND user_id = $2
             ORDER BY created_at DESC, id DESC"
        );

        sqlx::query_as::<_, Todo>(&sql)
            .bind(tenant_id)
            .bind(user_id)
            .fetch_all(executor)
            .await
    }

    /// Lists the public todos of a tenant, newest first
    pub async fn list_public<'e, E>(executor: E, tenant_id: Uuid) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let sql = format!(
            "SELECT {TODO_COLUMNS} FROM todos
             WHERE tenant_id = $1 AND is_public = TRUE
             ORDER BY created_at DESC, id DESC"
        );

        sqlx::query_as::<_, Todo>(&sql)
            .bind(tenant_id)
            .fetch_all(executor)
            .await
    }

    /// Persists the mutable fields of a todo
    ///
    /// Returns `None` when the row no longer exists (or is not visible).
    pub async fn update<'e, E>(executor: E, todo: &Todo) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let sql = format!(
            "UPDATE todos
             SET title = $3,
                 description = $4,
                 completed = $5,
                 is_public = $6,
                 due_date = $7,
                 completed_at = $8,
                 updated_at = NOW()
             WHERE tenant_id = $1 AND id = $2
             RETURNING {TODO_COLUMNS}"
        );

        sqlx::query_as::<_, Todo>(&sql)
            .bind(todo.tenant_id)
            .bind(todo.id)
            .bind(&todo.title)
            .bind(&todo.description)
            .bind(todo.completed)
            .bind(todo.is_public)
            .bind(todo.due_date)
            .bind(todo.completed_at)
            .fetch_optional(executor)
            .await
    }

    /// Deletes a todo, returning whether a row was removed
    pub async fn delete<'e, E>(executor: E, tenant_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM todos WHERE tenant_id = $1 AND id = $2")
            .bind(tenant_id)
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
