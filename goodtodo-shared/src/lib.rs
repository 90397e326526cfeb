//! # Good Todo Shared Library
//!
//! Domain types, services, persistence and use cases behind the Good Todo API.
//!
//! ## Module Organization
//!
//! - `models`: tenants, users and todos with their SQL
//! - `auth`: password hashing, JWT tokens, bearer authentication
//! - `db`: connection pool, migrations, tenant-scoped transactions
//! - `repository`: persistence traits with PostgreSQL and in-memory backends
//! - `usecase`: registration, login, profile and todo interactors
//! - `notification`: verification email rendering and delivery
//! - `id`: identifier generation

pub mod auth;
pub mod db;
pub mod id;
pub mod models;
pub mod notification;
pub mod repository;
pub mod usecase;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
