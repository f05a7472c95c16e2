use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::modules::security::core::identity::Identity;
use crate::modules::security::use_cases::verify_token::verifier::TokenVerifier;

/// Attaches an [`Identity`] to every request. Never rejects.
pub async fn authenticate(
    State(verifier): State<Arc<TokenVerifier>>,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = identify(&verifier, request.headers());
    request.extensions_mut().insert(identity);
    next.run(request).await
}

pub fn identify(verifier: &TokenVerifier, headers: &HeaderMap) -> Identity {
    let Some(token) = bearer_token(headers) else {
        return Identity::Anonymous;
    };
    match verifier.verify(token) {
        Ok(principal) => {
            tracing::debug!(subject = ?principal.claims.subject, "bearer token accepted");
            Identity::Authenticated(principal)
        }
        Err(error) => {
            tracing::debug!(%error, "bearer token rejected, continuing as anonymous");
            Identity::Anonymous
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    scheme.eq_ignore_ascii_case("bearer").then_some(token.trim())
}
