// Request pipeline.
//
// Stages run in the order of `PIPELINE`; the first stage sees the request first. The
// terminal stages are markers: routing, the API endpoint, controllers and the SPA fallback
// are the endpoints built by `shell::http`, which every layered stage wraps.

pub mod controllers;
pub mod exception_boundary;
pub mod https_redirection;
pub mod spa;
pub mod static_files;

use axum::{Router, http::header::STRICT_TRANSPORT_SECURITY, middleware::from_fn_with_state};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::modules::security::use_cases::verify_token::inbound::http::authenticate;
use crate::shell::state::AppState;
use exception_boundary::{PanicResponder, hsts_value};
use https_redirection::{HttpsRedirect, redirect_to_https};
use static_files::{StaticRoots, serve_static};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ExceptionBoundary,
    HttpsRedirection,
    StaticFiles,
    Authentication,
    Routing,
    ApiEndpoint,
    Controllers,
    Spa,
}

pub const PIPELINE: [Stage; 8] = [
    Stage::ExceptionBoundary,
    Stage::HttpsRedirection,
    Stage::StaticFiles,
    Stage::Authentication,
    Stage::Routing,
    Stage::ApiEndpoint,
    Stage::Controllers,
    Stage::Spa,
];

impl Stage {
    fn apply(self, router: Router, state: &AppState) -> Router {
        let settings = &state.settings;
        match self {
            Stage::ExceptionBoundary => {
                let router = router.layer(CatchPanicLayer::custom(PanicResponder::new(
                    settings.environment,
                )));
                if settings.environment.is_development() {
                    router
                } else {
                    router.layer(SetResponseHeaderLayer::if_not_present(
                        STRICT_TRANSPORT_SECURITY,
                        hsts_value(settings.hsts_max_age.as_secs()),
                    ))
                }
            }
            Stage::HttpsRedirection if !settings.enforce_https => router,
            Stage::HttpsRedirection => router.layer(from_fn_with_state(
                HttpsRedirect {
                    https_port: settings.https_port,
                    trust_forwarded_proto: settings.trust_forwarded_proto,
                },
                redirect_to_https,
            )),
            Stage::StaticFiles => router.layer(from_fn_with_state(
                StaticRoots::new(vec![settings.static_root.clone(), settings.spa_root.clone()]),
                serve_static,
            )),
            Stage::Authentication => {
                router.layer(from_fn_with_state(state.verifier.clone(), authenticate))
            }
            Stage::Routing | Stage::ApiEndpoint | Stage::Controllers | Stage::Spa => router,
        }
    }

    /// Terminal stages are served by the endpoints router rather than a layer.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Stage::Routing | Stage::ApiEndpoint | Stage::Controllers | Stage::Spa
        )
    }
}

/// Wraps `endpoints` in every stage. The last layer added is the outermost, so stages are
/// applied in reverse.
pub fn compose(endpoints: Router, state: &AppState) -> Router {
    PIPELINE
        .iter()
        .rev()
        .fold(endpoints, |router, stage| stage.apply(router, state))
}
