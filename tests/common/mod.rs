#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use access_guard::app::build_router;
use access_guard::config::Config;
use access_guard::repos::{DocumentStore, MemoryDocumentStore, MemoryUserDirectory, UserRecord};
use access_guard::services::auth::revocation::MemoryRevocationStore;
use access_guard::services::auth::{
    PasswordHasher, Role, SigningSecret, SubjectId, build_auth_service,
};
use access_guard::services::id_codec::IdCodec;
use access_guard::state::AppState;

pub const SECRET: &str = "integration-test-secret-0123456789abcdef";
pub const OTHER_SECRET: &str = "some-other-deployment-secret-0123456789";
/// Password of every seeded user.
pub const PASSWORD: &str = "correct horse battery";

/// In-process app over memory stores, seeded with one user and one admin.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub documents: Arc<MemoryDocumentStore>,
    pub config: Config,
    pub user: SubjectId,
    pub other_user: SubjectId,
    pub admin: SubjectId,
}

pub fn secret(raw: &str) -> SigningSecret {
    SigningSecret::new(raw).expect("test secret is long enough")
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(Config::for_development(secret(SECRET))).await
    }

    pub async fn spawn_with(mut config: Config) -> Self {
        // lowest bcrypt cost keeps the suite fast
        config.password_hash_cost = 4;
        let passwords = PasswordHasher::new(config.password_hash_cost).expect("valid cost");
        let password_hash = passwords.hash(PASSWORD).await.expect("hash seed password");

        let users = Arc::new(MemoryUserDirectory::new());
        let user = SubjectId::new(Uuid::new_v4());
        let other_user = SubjectId::new(Uuid::new_v4());
        let admin = SubjectId::new(Uuid::new_v4());

        for (id, name, role) in [
            (user, "alice", Role::User),
            (other_user, "bob", Role::User),
            (admin, "root", Role::Admin),
        ] {
            users
                .upsert(UserRecord {
                    id,
                    user_name: name.to_string(),
                    email: format!("{name}@example.com"),
                    role,
                    password_hash: password_hash.clone(),
                })
                .await;
        }

        let documents = Arc::new(MemoryDocumentStore::new());
        let auth = build_auth_service(&config, Arc::new(MemoryRevocationStore::new()));
        let id_codec = IdCodec::new(config.sqids_min_length, &config.sqids_alphabet)
            .expect("default sqids config is valid");

        let state = AppState::new(auth, documents.clone(), users, id_codec, passwords);
        let router = build_router(state.clone(), &config);

        Self {
            router,
            state,
            documents,
            config,
            user,
            other_user,
            admin,
        }
    }

    pub fn token_for(&self, subject: SubjectId, role: Role) -> String {
        self.state
            .auth
            .issue(subject, role)
            .expect("issue credential")
            .token
    }

    pub fn user_token(&self) -> String {
        self.token_for(self.user, Role::User)
    }

    pub fn other_user_token(&self) -> String {
        self.token_for(self.other_user, Role::User)
    }

    pub fn admin_token(&self) -> String {
        self.token_for(self.admin, Role::Admin)
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        auth: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(value) = auth {
            req = req.header(header::AUTHORIZATION, value);
        }
        let req = match body {
            Some(json) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => req.body(Body::empty()),
        }
        .expect("request builds");

        let res = self.router.clone().oneshot(req).await.expect("infallible");
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }

    /// Send a raw body with an optional content type; the response is parsed as JSON.
    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        token: &str,
        content_type: Option<&str>,
        body: &'static str,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"));
        if let Some(ct) = content_type {
            req = req.header(header::CONTENT_TYPE, ct);
        }
        let req = req.body(Body::from(body)).expect("request builds");

        let res = self.router.clone().oneshot(req).await.expect("infallible");
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("body");
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    /// POST /auth/login; returns the status and the body.
    pub async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(serde_json::json!({ "email": email, "password": password })),
        )
        .await
    }

    pub async fn send_bearer(
        &self,
        method: Method,
        uri: &str,
        token: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let header = format!("Bearer {token}");
        self.send(method, uri, Some(&header), body).await
    }

    /// Create a post as `token` and return its public id.
    pub async fn create_post(&self, token: &str, title: &str) -> String {
        let (status, body) = self
            .send_bearer(
                Method::POST,
                "/api/v1/posts",
                token,
                Some(serde_json::json!({ "title": title, "content": "body" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_str().expect("post id").to_string()
    }

    pub async fn document_count(&self, kind: access_guard::repos::ResourceKind) -> usize {
        self.documents
            .list(kind, None, 1000, 0)
            .await
            .expect("memory store never fails")
            .len()
    }
}
