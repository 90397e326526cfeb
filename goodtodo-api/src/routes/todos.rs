/// Todo endpoints
use crate::{
    app::AppState,
    error::{validate_request, ApiResult},
    extract::{ApiJson, ApiPath},
};
use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use goodtodo_shared::auth::Principal;
use goodtodo_shared::models::Todo;
use goodtodo_shared::usecase::{CreateTodoInput, UpdateTodoInput};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize)]
pub struct TodoResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub is_public: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Todo> for TodoResponse {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id,
            user_id: todo.user_id,
            title: todo.title,
            description: todo.description,
            completed: todo.completed,
            is_public: todo.is_public,
            due_date: todo.due_date,
            completed_at: todo.completed_at,
            created_at: todo.created_at,
            updated_at: todo.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodoListResponse {
    pub todos: Vec<TodoResponse>,
}

impl From<Vec<Todo>> for TodoListResponse {
    fn from(todos: Vec<Todo>) -> Self {
        Self {
            todos: todos.into_iter().map(TodoResponse::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTodoRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub is_public: bool,

    pub due_date: Option<DateTime<Utc>>,
}

/// Full replacement of a todo's mutable fields
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTodoRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    #[serde(default)]
    pub description: String,

    pub completed: bool,

    #[serde(default)]
    pub is_public: bool,

    pub due_date: Option<DateTime<Utc>>,
}

/// GET /api/v1/todos
pub async fn list_todos(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<TodoListResponse>> {
    let todos = state.todos.list(&principal).await?;
    Ok(Json(todos.into()))
}

/// GET /api/v1/todos-public
pub async fn list_public_todos(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<TodoListResponse>> {
    let todos = state.todos.list_public(&principal).await?;
    Ok(Json(todos.into()))
}

/// POST /api/v1/todos
pub async fn create_todo(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiJson(req): ApiJson<CreateTodoRequest>,
) -> ApiResult<(StatusCode, Json<TodoResponse>)> {
    validate_request(&req)?;

    let todo = state
        .todos
        .create(
            &principal,
            CreateTodoInput {
                title: req.title,
                description: req.description,
                is_public: req.is_public,
                due_date: req.due_date,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(todo.into())))
}

/// PUT /api/v1/todos/:id
pub async fn update_todo(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateTodoRequest>,
) -> ApiResult<Json<TodoResponse>> {
    validate_request(&req)?;

    let todo = state
        .todos
        .update(
            &principal,
            id,
            UpdateTodoInput {
                title: req.title,
                description: req.description,
                completed: req.completed,
                is_public: req.is_public,
                due_date: req.due_date,
            },
        )
        .await?;

    Ok(Json(todo.into()))
}

/// DELETE /api/v1/todos/:id
pub async fn delete_todo(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    state.todos.delete(&principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
