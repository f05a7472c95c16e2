// Conventional controller routing: `{controller}/{action=Index}/{id?}`.
//
// Names are matched case-insensitively. A path that names no known controller or action is
// not an error here; the caller falls through to the SPA host.

use async_trait::async_trait;
use axum::{
    Json,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

use crate::shell::pipeline::exception_boundary::error_page;
use crate::shell::scope::RequestScope;

pub const DEFAULT_ACTION: &str = "index";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerRoute {
    pub controller: String,
    pub action: String,
    pub id: Option<String>,
}

impl ControllerRoute {
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim_matches('/');
        if trimmed.is_empty() {
            return None;
        }
        let segments: Vec<&str> = trimmed.split('/').collect();
        if segments.len() > 3 || segments.iter().any(|s| s.is_empty()) {
            return None;
        }
        Some(Self {
            controller: segments[0].to_ascii_lowercase(),
            action: segments
                .get(1)
                .map(|a| a.to_ascii_lowercase())
                .unwrap_or_else(|| DEFAULT_ACTION.to_string()),
            id: segments.get(2).map(|s| s.to_string()),
        })
    }
}

#[async_trait]
pub trait Controller: Send + Sync {
    fn name(&self) -> &'static str;

    /// `None` when the controller has no such action.
    async fn invoke(
        &self,
        method: &Method,
        route: &ControllerRoute,
        scope: &RequestScope,
    ) -> Option<Response>;
}

#[derive(Clone, Default)]
pub struct ControllerRegistry {
    controllers: HashMap<String, Arc<dyn Controller>>,
}

impl ControllerRegistry {
    pub fn standard() -> Self {
        Self::default()
            .with(ErrorController)
            .with(HealthController)
    }

    pub fn with(mut self, controller: impl Controller + 'static) -> Self {
        self.controllers
            .insert(controller.name().to_ascii_lowercase(), Arc::new(controller));
        self
    }

    pub fn resolve(&self, path: &str) -> Option<(Arc<dyn Controller>, ControllerRoute)> {
        let route = ControllerRoute::parse(path)?;
        let controller = self.controllers.get(&route.controller)?.clone();
        Some((controller, route))
    }
}

/// Target of the production exception handler; renders the generic error page.
pub struct ErrorController;

#[async_trait]
impl Controller for ErrorController {
    fn name(&self) -> &'static str {
        "Error"
    }

    async fn invoke(&self, method: &Method, route: &ControllerRoute, _: &RequestScope) -> Option<Response> {
        if route.action != DEFAULT_ACTION || !is_read(method) {
            return None;
        }
        Some(error_page(StatusCode::OK))
    }
}

/// `GET /health` reports whether the data store answers.
pub struct HealthController;

#[async_trait]
impl Controller for HealthController {
    fn name(&self) -> &'static str {
        "Health"
    }

    async fn invoke(&self, method: &Method, route: &ControllerRoute, scope: &RequestScope) -> Option<Response> {
        if route.action != DEFAULT_ACTION || !is_read(method) {
            return None;
        }
        Some(match scope.db.ping().await {
            Ok(()) => Json(json!({ "status": "ok" })).into_response(),
            Err(error) => {
                tracing::warn!(%error, "health check failed");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({ "status": "unavailable" })),
                )
                    .into_response()
            }
        })
    }
}

fn is_read(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD)
}
