#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use chrono::Utc;
use serde_json::Value;
use tower::util::ServiceExt; // for `oneshot`

use warehouse_api::config::ApiConfig;
use warehouse_api::database::models::{Product, ProductCandidate, ProductValidator};
use warehouse_api::database::{ProductRepository, RepositoryError};
use warehouse_api::AppState;

pub const TEST_API_KEY: &str = "test-secret";

/// In-process stand-in for the Postgres repository.
#[derive(Default)]
pub struct MemoryProducts {
    rows: Mutex<Vec<Product>>,
    next_id: AtomicI64,
    /// When set, every call fails with a storage error.
    pub failing: AtomicBool,
    /// When set, list_page sleeps this long before answering.
    pub list_delay: Mutex<Option<Duration>>,
    /// Set when a delayed list_page future is dropped before finishing.
    pub list_cancelled: Arc<AtomicBool>,
}

impl MemoryProducts {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_products(candidates: &[ProductCandidate]) -> Arc<Self> {
        let store = Self::default();
        for candidate in candidates {
            store.insert(candidate.clone());
        }
        Arc::new(store)
    }

    pub fn fail_storage(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> Vec<Product> {
        self.rows.lock().unwrap().clone()
    }

    fn insert(&self, candidate: ProductCandidate) -> Product {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let product = candidate.into_product(id, Utc::now());
        self.rows.lock().unwrap().push(product.clone());
        product
    }

    fn check(&self) -> Result<(), RepositoryError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RepositoryError::Storage(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

struct CancelGuard {
    flag: Arc<AtomicBool>,
    finished: bool,
}

impl Drop for CancelGuard {
    fn drop(&mut self) {
        if !self.finished {
            self.flag.store(true, Ordering::SeqCst);
        }
    }
}

#[async_trait]
impl ProductRepository for MemoryProducts {
    async fn list_page(&self, limit: i64, offset: i64) -> Result<Vec<Product>, RepositoryError> {
        let delay = *self.list_delay.lock().unwrap();
        if let Some(delay) = delay {
            let mut guard = CancelGuard {
                flag: self.list_cancelled.clone(),
                finished: false,
            };
            tokio::time::sleep(delay).await;
            guard.finished = true;
        }
        self.check()?;

        let mut rows = self.snapshot();
        rows.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(rows
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn create(&self, candidate: ProductCandidate) -> Result<Product, RepositoryError> {
        self.check()?;
        Ok(self.insert(candidate))
    }

    async fn get_by_id(&self, id: i64) -> Result<Product, RepositoryError> {
        self.check()?;
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn update(&self, id: i64, candidate: ProductCandidate) -> Result<(), RepositoryError> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let row = rows.iter_mut().find(|p| p.id == id).ok_or(RepositoryError::NotFound)?;
        row.name = candidate.name;
        row.price = candidate.price;
        row.stock = candidate.stock;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|p| p.id != id);
        if rows.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.check()
    }
}

/// Router over the given store with the test API key configured.
pub fn setup_app(store: Arc<MemoryProducts>) -> Router {
    setup_app_with(store, Some(TEST_API_KEY), ApiConfig::default())
}

pub fn setup_app_with(store: Arc<MemoryProducts>, api_key: Option<&str>, api: ApiConfig) -> Router {
    let state = AppState::new(store, ProductValidator::new(), api_key.map(str::to_string));
    warehouse_api::app(state, &api)
}

/// Test helper: request without body
pub fn test_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Test helper: request carrying the test API key and an optional JSON body
pub fn authed_request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("X-API-Key", TEST_API_KEY);
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

/// Test helper: Extract JSON body from response
pub async fn extract_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

pub async fn extract_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body")
        .to_vec()
}
