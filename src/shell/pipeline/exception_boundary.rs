use axum::{
    body::Body,
    http::{HeaderValue, Response, StatusCode, header},
    response::{Html, IntoResponse},
};
use std::any::Any;
use tower_http::catch_panic::ResponseForPanic;

use crate::shell::config::Environment;

/// Answers unhandled faults. Detail is only rendered in Development.
#[derive(Debug, Clone, Copy)]
pub struct PanicResponder {
    expose_detail: bool,
}

impl PanicResponder {
    pub fn new(environment: Environment) -> Self {
        Self {
            expose_detail: environment.is_development(),
        }
    }
}

impl ResponseForPanic for PanicResponder {
    type ResponseBody = Body;

    fn response_for_panic(&mut self, err: Box<dyn Any + Send + 'static>) -> Response<Body> {
        let message = panic_message(err.as_ref());
        tracing::error!(panic = %message, "unhandled fault while processing request");
        if self.expose_detail {
            developer_page(&message)
        } else {
            error_page(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn panic_message(err: &(dyn Any + Send)) -> String {
    if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic payload".to_string()
    }
}

pub fn hsts_value(max_age_secs: u64) -> HeaderValue {
    HeaderValue::from_str(&format!("max-age={max_age_secs}"))
        .unwrap_or_else(|_| HeaderValue::from_static("max-age=2592000"))
}

/// Generic error page. Never carries fault detail.
pub fn error_page(status: StatusCode) -> Response<Body> {
    let body = "<!DOCTYPE html>\n<html><head><title>Error</title></head><body>\
                <h1 class=\"text-danger\">Error.</h1>\
                <h2 class=\"text-danger\">An error occurred while processing your request.</h2>\
                </body></html>";
    (status, no_store(), Html(body)).into_response()
}

fn developer_page(message: &str) -> Response<Body> {
    let body = format!(
        "<!DOCTYPE html>\n<html><head><title>Internal Server Error</title></head><body>\
         <h1>An unhandled exception occurred while processing the request.</h1>\
         <pre class=\"detail\">{}</pre></body></html>",
        escape_html(message)
    );
    (StatusCode::INTERNAL_SERVER_ERROR, no_store(), Html(body)).into_response()
}

fn no_store() -> [(header::HeaderName, HeaderValue); 1] {
    [(header::CACHE_CONTROL, HeaderValue::from_static("no-store"))]
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
