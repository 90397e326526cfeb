/// Configuration management for the API server
///
/// Loaded from environment variables (and a `.env` file when present).
///
/// | Variable | Default |
/// |---|---|
/// | `API_HOST` | `0.0.0.0` |
/// | `API_PORT` | `8000` |
/// | `CORS_ORIGINS` | `http://localhost:3000` (comma-separated) |
/// | `DATABASE_URL` | required; non-superuser role subject to RLS (see the RLS migration for grants) |
/// | `DATABASE_MIGRATION_URL` | unset; owner role, migrations run at startup when set |
/// | `DATABASE_MAX_CONNECTIONS` | `10` |
/// | `JWT_SECRET` | required, at least 32 characters |
/// | `JWT_ACCESS_TTL_MINUTES` | `15`, at most 1440 |
/// | `JWT_REFRESH_TTL_DAYS` | `7`, at most 365 |
/// | `MAIL_FROM` | `noreply@good-todo-go.local` |
/// | `APP_BASE_URL` | `http://localhost:3000` |
use std::env;
use std::str::FromStr;

use anyhow::Context;
use goodtodo_shared::auth::jwt::{DEFAULT_ACCESS_TTL_MINUTES, DEFAULT_REFRESH_TTL_DAYS};
use goodtodo_shared::notification::{DEFAULT_APP_BASE_URL, DEFAULT_FROM_ADDRESS};

/// Upper bounds on token lifetimes: one day for access, one year for refresh
pub const MAX_ACCESS_TTL_MINUTES: i64 = 24 * 60;
pub const MAX_REFRESH_TTL_DAYS: i64 = 365;

#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,

    pub database: DatabaseConfig,

    pub jwt: JwtConfig,

    pub mail: MailConfig,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,

    pub port: u16,

    /// Origins allowed by CORS
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,

    /// Owner connection used only for migrations
    pub migration_url: Option<String>,

    pub max_connections: u32,
}

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,

    pub access_ttl_minutes: i64,

    pub refresh_ttl_days: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .field("refresh_ttl_days", &self.refresh_ttl_days)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub from: String,

    /// Frontend base URL the verification link points at
    pub app_base_url: String,
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{} has an invalid value: {}", key, raw)),
        None => Ok(default),
    }
}

impl Config {
    /// Loads configuration from the process environment
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&lookup, "API_PORT", 8000u16)?;
        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| DEFAULT_APP_BASE_URL.to_string())
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();

        let url = lookup("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;
        let migration_url = lookup("DATABASE_MIGRATION_URL").filter(|u| !u.is_empty());
        let max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10u32)?;

        let secret = lookup("JWT_SECRET")
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;
        if secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }
        let access_ttl_minutes = parse_or(&lookup, "JWT_ACCESS_TTL_MINUTES", DEFAULT_ACCESS_TTL_MINUTES)?;
        let refresh_ttl_days = parse_or(&lookup, "JWT_REFRESH_TTL_DAYS", DEFAULT_REFRESH_TTL_DAYS)?;
        if access_ttl_minutes <= 0 || refresh_ttl_days <= 0 {
            anyhow::bail!("JWT token lifetimes must be positive");
        }
        if access_ttl_minutes > MAX_ACCESS_TTL_MINUTES {
            anyhow::bail!("JWT_ACCESS_TTL_MINUTES must be at most {}", MAX_ACCESS_TTL_MINUTES);
        }
        if refresh_ttl_days > MAX_REFRESH_TTL_DAYS {
            anyhow::bail!("JWT_REFRESH_TTL_DAYS must be at most {}", MAX_REFRESH_TTL_DAYS);
        }

        let from = lookup("MAIL_FROM").unwrap_or_else(|| DEFAULT_FROM_ADDRESS.to_string());
        let app_base_url = lookup("APP_BASE_URL").unwrap_or_else(|| DEFAULT_APP_BASE_URL.to_string());

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                cors_origins,
            },
            database: DatabaseConfig {
                url,
                migration_url,
                max_connections,
            },
            jwt: JwtConfig {
                secret,
                access_ttl_minutes,
                refresh_ttl_days,
            },
            mail: MailConfig { from, app_base_url },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}
