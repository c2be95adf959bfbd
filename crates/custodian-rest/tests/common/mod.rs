//! Shared fixtures for router tests: the real entity services over the
//! in-memory store and cache from `custodian_service::test_support`.

use argon2::Params;
use axum::{body::Body, http::Request, Router};
use custodian_config::ServerConfig;
use custodian_rest::{create_router, AppState};
use custodian_security::PasswordHasher;
use custodian_service::test_support::{InMemoryCache, InMemoryStore};
use custodian_service::{PrincipalServiceImpl, RoleServiceImpl};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use tracing::Span;

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
    pub cache: Arc<InMemoryCache>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let cache = Arc::new(InMemoryCache::new());
        let hasher = Arc::new(PasswordHasher::with_params(
            Params::new(1024, 1, 1, None).unwrap(),
        ));
        let ttl = Duration::from_secs(600);

        let principal_service = Arc::new(PrincipalServiceImpl::new(
            store.clone(),
            hasher,
            cache.clone(),
            ttl,
            Span::none(),
        ));
        let role_service = Arc::new(RoleServiceImpl::new(
            store.clone(),
            cache.clone(),
            ttl,
            Span::none(),
        ));

        let state = AppState::new(principal_service, role_service, Duration::from_secs(5));
        let router = create_router(state, &ServerConfig::default());
        Self {
            router,
            store,
            cache,
        }
    }

    /// Sends a request and returns the status and parsed JSON body.
    pub async fn send(&self, request: Request<Body>) -> (u16, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status().as_u16();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (u16, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn delete(&self, uri: &str) -> (u16, Value) {
        self.send(Request::delete(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (u16, Value) {
        self.send(json_request("POST", uri, &body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (u16, Value) {
        self.send(json_request("PUT", uri, &body)).await
    }
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
