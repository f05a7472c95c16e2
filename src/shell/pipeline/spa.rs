use axum::{
    body::{Body, to_bytes},
    extract::Request,
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use std::path::{Path, PathBuf};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::shell::config::{Environment, Settings};
use crate::shell::pipeline::exception_boundary::error_page;

const MAX_PROXIED_BODY: usize = 16 * 1024 * 1024;

const HOP_BY_HOP: [header::HeaderName; 8] = [
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
    header::CONTENT_LENGTH,
];

/// Last stage: whatever nothing else answered gets the client application.
#[derive(Debug, Clone)]
pub enum SpaHost {
    /// Serve the pre-built shell document.
    Bundled { shell: PathBuf },
    /// Forward to a separately running client dev server.
    DevServer {
        base_url: String,
        client: reqwest::Client,
    },
}

impl SpaHost {
    pub fn for_settings(settings: &Settings) -> Result<Self, reqwest::Error> {
        Ok(match settings.environment {
            Environment::Development => SpaHost::DevServer {
                base_url: settings.spa_dev_server.clone(),
                client: reqwest::Client::builder()
                    .redirect(reqwest::redirect::Policy::none())
                    .build()?,
            },
            _ => SpaHost::Bundled {
                shell: settings.spa_root.join("index.html"),
            },
        })
    }

    pub async fn serve(&self, request: Request) -> Response {
        match self {
            SpaHost::Bundled { shell } => serve_shell(shell, request).await,
            SpaHost::DevServer { base_url, client } => proxy(client, base_url, request).await,
        }
    }
}

async fn serve_shell(shell: &Path, request: Request) -> Response {
    if !matches!(*request.method(), Method::GET | Method::HEAD) {
        return StatusCode::NOT_FOUND.into_response();
    }
    let response = match ServeFile::new(shell).oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };
    if response.status() == StatusCode::NOT_FOUND {
        tracing::error!(
            shell = %shell.display(),
            "SPA shell document is missing; build the client application first"
        );
        return error_page(StatusCode::INTERNAL_SERVER_ERROR);
    }
    let mut response = response.map(Body::new);
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    response
}

async fn proxy(client: &reqwest::Client, base_url: &str, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let path = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let url = format!("{base_url}{path}");

    let body = match to_bytes(body, MAX_PROXIED_BODY).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::warn!(%error, "cannot buffer request for the dev server");
            return StatusCode::PAYLOAD_TOO_LARGE.into_response();
        }
    };

    let mut headers = parts.headers;
    strip_hop_by_hop(&mut headers);
    headers.remove(header::HOST);

    let upstream = client
        .request(parts.method, &url)
        .headers(headers)
        .body(body)
        .send()
        .await;

    let upstream = match upstream {
        Ok(upstream) => upstream,
        Err(error) => {
            tracing::error!(%error, %url, "SPA development server is not reachable");
            return (
                StatusCode::BAD_GATEWAY,
                format!("SPA development server is not reachable at {base_url}"),
            )
                .into_response();
        }
    };

    let status = upstream.status();
    let mut headers = upstream.headers().clone();
    strip_hop_by_hop(&mut headers);
    match upstream.bytes().await {
        Ok(bytes) => {
            let mut response = Response::new(Body::from(bytes));
            *response.status_mut() = status;
            *response.headers_mut() = headers;
            response
        }
        Err(error) => {
            tracing::error!(%error, %url, "SPA development server response was cut short");
            StatusCode::BAD_GATEWAY.into_response()
        }
    }
}

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP.iter() {
        headers.remove(name);
    }
    headers.remove("keep-alive");
}
