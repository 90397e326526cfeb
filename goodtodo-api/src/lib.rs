//! # Good Todo API Server
//!
//! Multi-tenant todo REST API built on axum.
//!
//! ## Modules
//!
//! - `app`: application state, router and authentication layer
//! - `config`: configuration from the environment
//! - `error`: error handling and HTTP response mapping
//! - `extract`: body and path extractors that reject with `ApiError`
//! - `routes`: request handlers and their DTOs

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
