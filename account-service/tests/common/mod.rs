//! Test helpers for account-service integration tests.
//!
//! Requests go through the full router with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use account_service::{
    build_router,
    config::{AccountConfig, MongoConfig, StoreBackend},
    models::{Account, NewAccount},
    services::{AccountStore, InMemoryAccountStore, StoreError},
    AppState,
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use mongodb::bson::oid::ObjectId;
use serde_json::Value;
use service_core::config::Config as CoreConfig;
use std::sync::Arc;
use tower::ServiceExt;

pub fn test_config() -> AccountConfig {
    AccountConfig {
        common: CoreConfig { port: 0 },
        service_name: "account-service".to_string(),
        log_level: "debug".to_string(),
        otlp_endpoint: None,
        store: StoreBackend::Memory,
        mongodb: MongoConfig {
            uri: std::env::var("MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            database: "accounts_test".to_string(),
            collection: "accounts".to_string(),
        },
        swagger_enabled: true,
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Router wired to a store of the test's choosing.
pub struct TestApp {
    router: Router,
    pub store: Arc<dyn AccountStore>,
}

impl TestApp {
    pub fn spawn() -> Self {
        Self::with_store(Arc::new(InMemoryAccountStore::new()))
    }

    pub fn with_store(store: Arc<dyn AccountStore>) -> Self {
        let state = AppState::new(test_config(), store.clone());
        Self {
            router: build_router(state),
            store,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.send(builder.body(body).unwrap()).await
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn create(&self, username: &str, email: &str, password: &str) -> TestResponse {
        self.request(
            Method::POST,
            "/accounts",
            Some(serde_json::json!({
                "username": username,
                "email": email,
                "password": password,
            })),
        )
        .await
    }
}

/// Store whose every call fails, for exercising the 500 paths.
pub struct FailingAccountStore;

fn unavailable() -> StoreError {
    StoreError::Backend(anyhow::anyhow!("store unavailable"))
}

#[async_trait]
impl AccountStore for FailingAccountStore {
    async fn list(&self) -> Result<Vec<Account>, StoreError> {
        Err(unavailable())
    }

    async fn find_by_id(&self, _id: ObjectId) -> Result<Option<Account>, StoreError> {
        Err(unavailable())
    }

    async fn insert(&self, _account: NewAccount) -> Result<Account, StoreError> {
        Err(unavailable())
    }

    async fn delete_by_id(&self, _id: ObjectId) -> Result<bool, StoreError> {
        Err(unavailable())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Err(unavailable())
    }
}
