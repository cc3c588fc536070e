//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use crudkit_api::{AppState, build_app};
use crudkit_core::config::AppConfig;
use crudkit_database::{EntityStore, MemoryStore};
use crudkit_entity::{Pokemon, Trainer, fixtures};

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Pokemon rows, for direct inspection
    pub pokemon: MemoryStore<Pokemon>,
}

impl TestApp {
    /// Create a new test application over the seeded in-memory stores
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a test application with explicit configuration
    pub fn with_config(config: AppConfig) -> Self {
        let pokemon = MemoryStore::seeded(fixtures::pokemon());
        let pokemon_store: Arc<dyn EntityStore<Pokemon>> = Arc::new(pokemon.clone());
        let trainer_store: Arc<dyn EntityStore<Trainer>> =
            Arc::new(MemoryStore::seeded(fixtures::trainers()));

        let state = AppState::new(config, pokemon_store, trainer_store);

        Self {
            router: build_app(state),
            pokemon,
        }
    }

    /// Make a JSON request with optional body and headers
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        for (name, value) in headers {
            req = req.header(*name, *value);
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let raw = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body")
            .to_vec();

        let body: Value = serde_json::from_slice(&raw).unwrap_or(Value::Null);

        TestResponse { status, body, raw }
    }

    /// GET without a body
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None, &[]).await
    }

    /// POST a JSON body
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body), &[]).await
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body, `Null` when the body is not JSON
    pub body: Value,
    /// Body bytes as received
    pub raw: Vec<u8>,
}

impl TestResponse {
    /// Names of the pokemon in `data`, or in `data.items` for pages
    pub fn names(&self) -> Vec<String> {
        let data = &self.body["data"];
        let rows = data
            .get("items")
            .unwrap_or(data)
            .as_array()
            .cloned()
            .unwrap_or_default();
        rows.iter()
            .filter_map(|row| row["name"].as_str().map(str::to_string))
            .collect()
    }
}
