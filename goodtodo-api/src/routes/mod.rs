/// API route handlers
///
/// - `health`: liveness and database status
/// - `auth`: registration, login, email verification, token refresh
/// - `users`: the caller's profile
/// - `todos`: todo CRUD and the tenant's public list
pub mod auth;
pub mod health;
pub mod todos;
pub mod users;
