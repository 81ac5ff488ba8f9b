#![allow(dead_code)]

use async_trait::async_trait;
use availability_service::config::{AvailabilityConfig, MongoConfig, StoreBackend, StoreConfig};
use availability_service::services::{InMemoryProductStore, ProductStore, StoreError};
use availability_service::{build_router, AppState, Application};
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use secrecy::Secret;
use service_core::config::Config as CoreConfig;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;

pub const KNOWN_PRODUCTS: [&str; 2] = ["keychain", "phone stand"];

pub fn test_config() -> AvailabilityConfig {
    AvailabilityConfig {
        common: CoreConfig {
            port: 0,
            log_level: "error".to_string(),
            otlp_endpoint: None,
        },
        mongodb: MongoConfig {
            uri: Secret::new(
                std::env::var("TEST_MONGODB_URI")
                    .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            ),
            database: format!("availability_test_{}", uuid::Uuid::new_v4()),
        },
        store: StoreConfig {
            backend: StoreBackend::Memory,
            seed: KNOWN_PRODUCTS.iter().map(|p| p.to_string()).collect(),
            timeout_ms: 200,
        },
    }
}

pub fn seeded_store() -> Arc<InMemoryProductStore> {
    Arc::new(InMemoryProductStore::with_products(KNOWN_PRODUCTS))
}

pub fn router_with_store(store: Arc<dyn ProductStore>) -> Router {
    build_router(AppState::new(test_config(), store))
}

/// Store whose every call fails, counting lookups.
#[derive(Default)]
pub struct FailingStore {
    pub calls: AtomicUsize,
}

impl FailingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProductStore for FailingStore {
    async fn exists(&self, _key: &str) -> Result<bool, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Unavailable(
            "connection refused by 10.0.0.12:27017".to_string(),
        ))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Err(StoreError::Unavailable(
            "connection refused by 10.0.0.12:27017".to_string(),
        ))
    }
}

/// Store that never answers within the configured timeout.
pub struct HangingStore;

#[async_trait]
impl ProductStore for HangingStore {
    async fn exists(&self, _key: &str) -> Result<bool, StoreError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(true)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: serde_json::Value,
}

pub async fn send(app: Router, request: Request<Body>) -> TestResponse {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

pub async fn post_raw(app: Router, body: impl Into<Body>) -> TestResponse {
    send(
        app,
        Request::builder()
            .method("POST")
            .uri("/check_product")
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap(),
    )
    .await
}

pub async fn post_product(app: Router, name: &str) -> TestResponse {
    post_raw(app, serde_json::json!({ "ProductName": name }).to_string()).await
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
}

impl TestApp {
    /// Spawn the service on a random port backed by the seeded memory store.
    pub async fn spawn() -> Self {
        let app = Application::build(test_config())
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        TestApp { address, port }
    }
}
