/// Application state and router
///
/// Routes live under `/api/v1`. Everything except health and the auth
/// endpoints sits behind [`jwt_auth_layer`], which puts the caller's
/// [`Principal`] into request extensions.
use crate::{config::Config, error::ApiError};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post, put},
    Router,
};
use chrono::Duration;
use goodtodo_shared::auth::{authenticate, JwtService, PasswordService, Principal};
use goodtodo_shared::id::{IdGenerator, UuidGenerator};
use goodtodo_shared::notification::{LogNotificationSender, NotificationSender, VerificationTemplate};
use goodtodo_shared::repository::{
    PgTenantRepository, PgTodoRepository, PgUserRepository, TenantRepository, TodoRepository,
    UserRepository,
};
use goodtodo_shared::usecase::{AuthInteractor, TodoInteractor, UserInteractor};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Storage and side-effect handles the interactors are built from
pub struct Backend {
    /// Present when backed by PostgreSQL; used by the health check
    pub db: Option<PgPool>,
    pub tenants: Arc<dyn TenantRepository>,
    pub users: Arc<dyn UserRepository>,
    pub todos: Arc<dyn TodoRepository>,
    pub ids: Arc<dyn IdGenerator>,
    pub notifier: Arc<dyn NotificationSender>,
    pub passwords: PasswordService,
}

impl Backend {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            tenants: Arc::new(PgTenantRepository::new(pool.clone())),
            users: Arc::new(PgUserRepository::new(pool.clone())),
            todos: Arc::new(PgTodoRepository::new(pool.clone())),
            db: Some(pool),
            ids: Arc::new(UuidGenerator),
            notifier: Arc::new(LogNotificationSender),
            passwords: PasswordService::new(),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Option<PgPool>,

    pub config: Arc<Config>,

    pub tokens: Arc<JwtService>,

    /// Slug lookup for login
    pub tenants: Arc<dyn TenantRepository>,

    pub auth: Arc<AuthInteractor>,

    pub users: Arc<UserInteractor>,

    pub todos: Arc<TodoInteractor>,
}

impl AppState {
    pub fn new(config: Config, backend: Backend) -> Self {
        let tokens = Arc::new(JwtService::with_ttls(
            &config.jwt.secret,
            Duration::minutes(config.jwt.access_ttl_minutes),
            Duration::days(config.jwt.refresh_ttl_days),
        ));
        let template = VerificationTemplate::new(&config.mail.from, &config.mail.app_base_url);

        let auth = AuthInteractor::new(
            backend.tenants.clone(),
            backend.users.clone(),
            tokens.clone(),
            Arc::new(backend.passwords),
            backend.ids.clone(),
            backend.notifier,
            template,
        );
        let users = UserInteractor::new(backend.users);
        let todos = TodoInteractor::new(backend.todos, backend.ids);

        Self {
            db: backend.db,
            config: Arc::new(config),
            tokens,
            tenants: backend.tenants,
            auth: Arc::new(auth),
            users: Arc::new(users),
            todos: Arc::new(todos),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/verify-email", post(routes::auth::verify_email))
        .route("/refresh", post(routes::auth::refresh));

    let protected_routes = Router::new()
        .route("/me", get(routes::users::get_me).put(routes::users::update_me))
        .route("/todos", get(routes::todos::list_todos).post(routes::todos::create_todo))
        .route("/todos-public", get(routes::todos::list_public_todos))
        .route(
            "/todos/:id",
            put(routes::todos::update_todo).delete(routes::todos::delete_todo),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let v1_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/auth", auth_routes)
        .merge(protected_routes);

    let cors = if state.config.api.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .nest("/api/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Validates the bearer access token and stores the [`Principal`]
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal: Principal = authenticate(req.headers(), &state.tokens).map_err(|e| {
        tracing::debug!(error = %e, "Rejected request");
        ApiError::from(e)
    })?;

    req.extensions_mut().insert(principal);
    Ok(next.run(req).await)
}
