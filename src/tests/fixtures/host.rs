// In-process host for end-to-end tests: the real pipeline over in-memory infrastructure.

use async_graphql::Executor;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;

use crate::shared::infrastructure::data_access::in_memory::InMemoryDataStore;
use crate::shared::infrastructure::mail_outbox::in_memory::InMemoryMailOutbox;
use crate::shell::build_state;
use crate::shell::config::Settings;
use crate::shell::graphql::build_schema;
use crate::shell::http::router;
use crate::shell::state::AppState;
use crate::tests::fixtures::assets::{client_root, server_root};
use crate::tests::fixtures::tokens::{AUDIENCE, ISSUER, SECRET};

pub struct TestHost {
    pub router: Router,
    pub state: AppState,
    pub outbox: Arc<InMemoryMailOutbox>,
}

pub struct TestHostBuilder {
    vars: HashMap<String, String>,
}

impl Default for TestHostBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHostBuilder {
    pub fn new() -> Self {
        let vars = [
            ("APP_ENV", "Production".to_string()),
            ("DEFAULT_CONNECTION", "Server=localhost;Database=scheduling".to_string()),
            ("SECRET_KEY", SECRET.to_string()),
            ("JWT_ISSUER", ISSUER.to_string()),
            ("JWT_AUDIENCE", AUDIENCE.to_string()),
            ("ENFORCE_HTTPS", "false".to_string()),
            ("GRAPHQL_METRICS", "false".to_string()),
            ("STATIC_ROOT", server_root().display().to_string()),
            ("SPA_ROOT", client_root().display().to_string()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        Self { vars }
    }

    pub fn var(mut self, key: &str, value: impl Into<String>) -> Self {
        self.vars.insert(key.to_string(), value.into());
        self
    }

    pub fn development(self) -> Self {
        self.var("APP_ENV", "Development")
    }

    fn settings(&self) -> Settings {
        let vars = self.vars.clone();
        Settings::from_lookup(move |key| vars.get(key).cloned()).unwrap()
    }

    fn state(&self) -> (AppState, Arc<InMemoryMailOutbox>) {
        let outbox = Arc::new(InMemoryMailOutbox::new());
        let state = build_state(
            self.settings(),
            Arc::new(InMemoryDataStore::new()),
            outbox.clone(),
        )
        .unwrap();
        (state, outbox)
    }

    pub fn build(self) -> TestHost {
        let (state, outbox) = self.state();
        let schema = build_schema(&state.settings);
        TestHost {
            router: router(state.clone(), schema),
            state,
            outbox,
        }
    }

    /// Same pipeline in front of a schema supplied by the test.
    pub fn build_with<E: Executor>(self, executor: E) -> TestHost {
        let (state, outbox) = self.state();
        TestHost {
            router: router(state.clone(), executor),
            state,
            outbox,
        }
    }
}

impl TestHost {
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn graphql(&self, query: &str, bearer: Option<&str>) -> (StatusCode, Value) {
        let mut request = Request::post("/graphql").header(header::CONTENT_TYPE, "application/json");
        if let Some(bearer) = bearer {
            request = request.header(header::AUTHORIZATION, bearer);
        }
        let request = request
            .body(Body::from(json!({ "query": query }).to_string()))
            .unwrap();
        let response = self.send(request).await;
        let status = response.status();
        (status, serde_json::from_str(&text(response).await).unwrap())
    }
}

pub async fn text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&bytes).into_owned()
}
