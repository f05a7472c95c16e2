use axum::{
    body::Body,
    extract::{Request, State},
    http::{Method, StatusCode, request::Parts},
    middleware::Next,
    response::Response,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::services::ServeDir;

/// Roots searched in order: server assets first, then the bundled client output.
#[derive(Debug, Clone)]
pub struct StaticRoots(Arc<Vec<PathBuf>>);

impl StaticRoots {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self(Arc::new(roots))
    }
}

/// Serves an existing file for GET/HEAD requests; anything else moves on down the pipeline.
pub async fn serve_static(
    State(roots): State<StaticRoots>,
    request: Request,
    next: Next,
) -> Response {
    if !matches!(*request.method(), Method::GET | Method::HEAD) {
        return next.run(request).await;
    }
    let (parts, body) = request.into_parts();
    for root in roots.0.iter() {
        let served = ServeDir::new(root)
            .append_index_html_on_directories(false)
            .oneshot(lookup(&parts))
            .await;
        let response = match served {
            Ok(response) => response,
            Err(never) => match never {},
        };
        if is_served(response.status()) {
            tracing::trace!(path = parts.uri.path(), root = %root.display(), "static asset");
            return response.map(Body::new);
        }
    }
    next.run(Request::from_parts(parts, body)).await
}

// Misses and unreadable entries fall through to later stages.
fn is_served(status: StatusCode) -> bool {
    status.is_success()
        || matches!(
            status,
            StatusCode::NOT_MODIFIED | StatusCode::RANGE_NOT_SATISFIABLE | StatusCode::PRECONDITION_FAILED
        )
}

fn lookup(parts: &Parts) -> Request {
    let mut request = Request::new(Body::empty());
    *request.method_mut() = parts.method.clone();
    *request.uri_mut() = parts.uri.clone();
    *request.version_mut() = parts.version;
    *request.headers_mut() = parts.headers.clone();
    request
}
