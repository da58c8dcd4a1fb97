//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with a mock listing source injected, enabling E2E testing without
//! network access.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use shelf_core::{
    testing::MockRecordSource, CacheConfig, CatalogService, Config, DatabaseConfig,
    MemorizedStore, ServerConfig, SqliteMemorizedStore,
};

/// Re-export fixtures for test convenience
pub use shelf_core::testing::fixtures;

/// Test fixture for E2E testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_memorize() {
///     let fixture = TestFixture::new().await;
///
///     let response = fixture.post("/api/v1/memorized", json!({
///         "title": "Book 1",
///         "link": "https://www.royalroad.com/fiction/1"
///     })).await;
///
///     assert_eq!(response.status, 201);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock listing source - configure popular and search results
    pub source: Arc<MockRecordSource>,
    /// Temporary directory for the test database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    /// Parsed JSON body, or `Null` for empty/non-JSON bodies
    pub body: Value,
    /// Raw body text
    pub text: String,
    /// `HX-Trigger` response header, if any
    pub hx_trigger: Option<String>,
}

impl TestFixture {
    /// Create a new test fixture backed by an on-disk SQLite store and
    /// twelve popular books ("Book 1" .. "Book 12").
    pub async fn new() -> Self {
        Self::with_popular(fixtures::numbered_books(12)).await
    }

    /// Create a test fixture with a custom popular listing.
    pub async fn with_popular(popular: Vec<shelf_core::Book>) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let store: Arc<dyn MemorizedStore> = Arc::new(
            SqliteMemorizedStore::new(&db_path).expect("Failed to create memorized store"),
        );
        Self::build(temp_dir, popular, store)
    }

    /// Create a test fixture with a caller-supplied memorized store.
    pub async fn with_store(store: Arc<dyn MemorizedStore>) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self::build(temp_dir, fixtures::numbered_books(12), store)
    }

    fn build(
        temp_dir: TempDir,
        popular: Vec<shelf_core::Book>,
        store: Arc<dyn MemorizedStore>,
    ) -> Self {
        let source = Arc::new(MockRecordSource::with_popular(popular));

        let config = Config {
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
            },
            database: DatabaseConfig {
                path: temp_dir.path().join("test.db"),
            },
            source: Default::default(),
            cache: CacheConfig { prefetch: false },
        };

        let catalog = Arc::new(CatalogService::new(
            Arc::clone(&source) as Arc<dyn shelf_core::RecordSource>,
            store,
        ));

        let state = Arc::new(shelf_server::state::AppState::new(config, catalog));
        let router = shelf_server::api::create_router(state);

        Self {
            router,
            source,
            temp_dir,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a POST request without a body.
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        self.request("POST", path, None).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a POST request with an urlencoded form body.
    pub async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        self.request_raw("POST", path, &body, "application/x-www-form-urlencoded")
            .await
    }

    /// Send a request with raw string body and custom content type.
    async fn request_raw(
        &self,
        method: &str,
        path: &str,
        body: &str,
        content_type: &str,
    ) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", content_type)
            .body(Body::from(body.to_string()))
            .unwrap();

        self.send(request).await
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let hx_trigger = response
            .headers()
            .get("HX-Trigger")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).into_owned();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            body,
            text,
            hx_trigger,
        }
    }
}
