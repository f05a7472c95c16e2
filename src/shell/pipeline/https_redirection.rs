use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header, uri::Scheme},
    middleware::Next,
    response::{IntoResponse, Response},
};

pub const FORWARDED_PROTO: &str = "x-forwarded-proto";

#[derive(Debug, Clone, Copy)]
pub struct HttpsRedirect {
    pub https_port: u16,
    pub trust_forwarded_proto: bool,
}

/// Redirects plain HTTP requests to their HTTPS equivalent before anything else runs.
pub async fn redirect_to_https(
    State(config): State<HttpsRedirect>,
    request: Request,
    next: Next,
) -> Response {
    if is_https(&request, config.trust_forwarded_proto) {
        return next.run(request).await;
    }
    match https_location(&request, config.https_port) {
        Some(location) => {
            tracing::debug!(%location, "redirecting to https");
            (StatusCode::TEMPORARY_REDIRECT, [(header::LOCATION, location)]).into_response()
        }
        None => (StatusCode::BAD_REQUEST, "missing host").into_response(),
    }
}

/// The forwarded scheme only counts when `trust_forwarded_proto` is set.
pub fn is_https(request: &Request, trust_forwarded_proto: bool) -> bool {
    if request.uri().scheme() == Some(&Scheme::HTTPS) {
        return true;
    }
    trust_forwarded_proto
        && forwarded_proto(request.headers()).is_some_and(|proto| proto.eq_ignore_ascii_case("https"))
}

fn forwarded_proto(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(FORWARDED_PROTO)?.to_str().ok()?;
    value.split(',').next().map(str::trim)
}

fn https_location(request: &Request, https_port: u16) -> Option<String> {
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
        .or_else(|| request.uri().authority().map(|a| a.as_str().to_string()))?;
    let host = strip_port(host.trim());
    if host.is_empty() {
        return None;
    }
    let path = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    Some(if https_port == 443 {
        format!("https://{host}{path}")
    } else {
        format!("https://{host}:{https_port}{path}")
    })
}

fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}
