//! Shared harness for API integration tests

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body, Bytes},
    http::{header, Method, Request, StatusCode},
    Router,
};
use pressroom_api::{create_router, AppState};
use pressroom_common::{
    auth::{JwtManager, Role},
    config::AppConfig,
    db::DbPool,
};
use sea_orm::{ConnectOptions, Database};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

pub const MULTIPART_BOUNDARY: &str = "pressroom-test-boundary";

pub struct TestApp {
    pub router: Router,
    pub jwt: Arc<JwtManager>,
    pub static_root: PathBuf,
    _dir: TempDir,
}

/// Router over a fresh in-memory database and a temporary static root
pub async fn spawn_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();

    let mut config = AppConfig::default();
    config.media.static_root = dir.path().join("static");
    config.media.upload_dir = config.media.static_root.join("uploads");
    config.media.max_upload_bytes = 64 * 1024;
    let static_root = config.media.static_root.clone();

    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = DbPool::from_connection(Database::connect(opts).await.unwrap());
    db.init_schema().await.unwrap();

    let state = AppState::new(config, db, JwtManager::new("integration-secret", 3600));
    let jwt = state.jwt.clone();

    TestApp {
        router: create_router(state, None),
        jwt,
        static_root,
        _dir: dir,
    }
}

impl TestApp {
    pub fn token(&self, role: Role) -> String {
        self.jwt.generate_token(Uuid::new_v4(), role).unwrap()
    }

    pub fn admin_token(&self) -> String {
        self.token(Role::Admin)
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Bytes) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body)
    }

    /// Send a JSON request; an empty response body comes back as `Value::Null`
    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let (status, bytes) = self.send(request).await;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.json(Method::GET, uri, None, None).await
    }

    /// POST as admin
    pub async fn create(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let token = self.admin_token();
        self.json(Method::POST, uri, Some(&token), Some(body)).await
    }

    /// POST as admin and return the new id
    pub async fn create_id(&self, uri: &str, body: Value) -> String {
        let (status, body) = self.create(uri, body).await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let token = self.admin_token();
        self.json(Method::PUT, uri, Some(&token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> StatusCode {
        let token = self.admin_token();
        self.json(Method::DELETE, uri, Some(&token), None).await.0
    }
}

/// Multipart body with one file part followed by plain text fields
pub fn multipart_body(file_name: &str, content_type: &str, data: &[u8], fields: &[(&str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\nContent-Type: {c}\r\n\r\n",
            b = MULTIPART_BOUNDARY,
            f = file_name,
            c = content_type
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(b"\r\n");

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{b}\r\nContent-Disposition: form-data; name=\"{n}\"\r\n\r\n{v}\r\n",
                b = MULTIPART_BOUNDARY,
                n = name,
                v = value
            )
            .as_bytes(),
        );
    }

    body.extend_from_slice(format!("--{}--\r\n", MULTIPART_BOUNDARY).as_bytes());
    body
}

/// Multipart upload request to `/api/media/upload`
pub fn upload_request(body: Vec<u8>, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/api/media/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY),
        );
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body)).unwrap()
}
