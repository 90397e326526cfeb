/// Common test utilities for API integration tests
///
/// The router runs over the in-memory repositories with a recording
/// notification sender, so no database is needed.
use axum::body::Body;
use axum::http::{Request, StatusCode};
use goodtodo_api::app::{build_router, AppState, Backend};
use goodtodo_api::config::Config;
use goodtodo_shared::auth::PasswordService;
use goodtodo_shared::id::UuidGenerator;
use goodtodo_shared::notification::RecordingNotificationSender;
use goodtodo_shared::models::{NewUser, UserRole};
use goodtodo_shared::repository::{MemoryStore, TenantRepository, UserRepository};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tower::Service as _;
use uuid::Uuid;

pub const PASSWORD: &str = "password123";

pub struct TestContext {
    pub app: axum::Router,
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<RecordingNotificationSender>,
}

/// A verified, logged-in user
#[allow(dead_code)]
pub struct Session {
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub tenant_slug: String,
    pub email: String,
    pub access_token: String,
    pub refresh_token: String,
}

pub fn test_config() -> Config {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("DATABASE_URL", "postgresql://unused/unused"),
        ("JWT_SECRET", "integration-test-secret-at-least-32-bytes"),
        ("APP_BASE_URL", "http://frontend.test"),
    ]);
    Config::from_lookup(|key| vars.get(key).map(|v| v.to_string())).expect("test config")
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_notifier(RecordingNotificationSender::new())
    }

    pub fn with_notifier(notifier: RecordingNotificationSender) -> Self {
        let config = test_config();
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(notifier);

        let backend = Backend {
            db: None,
            tenants: store.clone(),
            users: store.clone(),
            todos: store.clone(),
            ids: Arc::new(UuidGenerator),
            notifier: notifier.clone(),
            passwords: PasswordService::with_cost(1024, 1, 1).expect("password params"),
        };
        let app = build_router(AppState::new(config, backend));

        Self {
            app,
            store,
            notifier,
        }
    }

    /// Sends a request and returns the status with the parsed JSON body
    /// (`Value::Null` for an empty body)
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
        };
        (status, json)
    }

    pub async fn register(&self, email: &str, name: &str) -> (StatusCode, Value) {
        self.send(
            "POST",
            "/api/v1/auth/register",
            None,
            Some(serde_json::json!({ "email": email, "password": PASSWORD, "name": name })),
        )
        .await
    }

    pub async fn tenant_slug(&self, tenant_id: Uuid) -> String {
        TenantRepository::find_by_id(self.store.as_ref(), tenant_id)
            .await
            .unwrap()
            .expect("tenant exists")
            .slug
    }

    pub fn verification_token(&self, email: &str) -> String {
        self.notifier.last_token_for(email).expect("verification email sent")
    }

    pub async fn login(&self, slug: &str, email: &str, password: &str) -> (StatusCode, Value) {
        self.send(
            "POST",
            "/api/v1/auth/login",
            None,
            Some(serde_json::json!({ "tenant_slug": slug, "email": email, "password": password })),
        )
        .await
    }

    /// Registers, verifies and logs in a fresh user in a new tenant
    pub async fn signed_in_user(&self, email: &str) -> Session {
        let (status, body) = self.register(email, "Test User").await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

        let user_id: Uuid = body["user_id"].as_str().unwrap().parse().unwrap();
        let tenant_id: Uuid = body["tenant_id"].as_str().unwrap().parse().unwrap();

        let token = self.verification_token(email);
        let (status, body) = self
            .send(
                "POST",
                "/api/v1/auth/verify-email",
                None,
                Some(serde_json::json!({ "token": token })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "verify failed: {}", body);

        let tenant_slug = self.tenant_slug(tenant_id).await;
        let (status, body) = self.login(&tenant_slug, email, PASSWORD).await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);

        Session {
            user_id,
            tenant_id,
            tenant_slug,
            email: email.to_string(),
            access_token: body["access_token"].as_str().unwrap().to_string(),
            refresh_token: body["refresh_token"].as_str().unwrap().to_string(),
        }
    }

    /// Adds a verified member to an existing tenant and logs them in
    pub async fn member_of(&self, owner: &Session, email: &str) -> Session {
        let passwords = PasswordService::with_cost(1024, 1, 1).unwrap();
        let user = UserRepository::create(
            self.store.as_ref(),
            NewUser {
                id: Uuid::new_v4(),
                tenant_id: owner.tenant_id,
                email: email.to_string(),
                password_hash: passwords.hash(PASSWORD).unwrap(),
                name: "Member".to_string(),
                role: UserRole::Member,
                verification_token: None,
                verification_token_expires_at: None,
            },
        )
        .await
        .unwrap();

        let mut verified = user.clone();
        verified.mark_verified();
        UserRepository::update(self.store.as_ref(), &verified).await.unwrap();

        let (status, body) = self.login(&owner.tenant_slug, email, PASSWORD).await;
        assert_eq!(status, StatusCode::OK, "member login failed: {}", body);

        Session {
            user_id: user.id,
            tenant_id: owner.tenant_id,
            tenant_slug: owner.tenant_slug.clone(),
            email: email.to_string(),
            access_token: body["access_token"].as_str().unwrap().to_string(),
            refresh_token: body["refresh_token"].as_str().unwrap().to_string(),
        }
    }

    pub async fn create_todo(&self, session: &Session, title: &str, is_public: bool) -> Value {
        let (status, body) = self
            .send(
                "POST",
                "/api/v1/todos",
                Some(&session.access_token),
                Some(serde_json::json!({ "title": title, "is_public": is_public })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create todo failed: {}", body);
        body
    }
}
