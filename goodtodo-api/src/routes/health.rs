/// Health check endpoint
///
/// Always answers 200; `status` is `degraded` when the database is configured
/// but unreachable.
use crate::app::AppState;
use axum::{extract::State, Json};
use goodtodo_shared::db::pool::health_check as db_health_check;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,

    pub version: String,

    /// `connected`, `disconnected` or `not_configured`
    pub database: String,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match &state.db {
        Some(pool) => match db_health_check(pool).await {
            Ok(()) => "connected",
            Err(_) => "disconnected",
        },
        None => "not_configured",
    };

    Json(HealthResponse {
        status: if database == "disconnected" { "degraded" } else { "ok" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
    })
}
