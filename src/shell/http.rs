use async_graphql::Executor;
use axum::{
    Extension, Router,
    extract::{Request, State},
    response::Response,
    routing::post,
};
use tower_http::trace::TraceLayer;

use crate::modules::security::core::identity::Identity;
use crate::shell::graphql::{self, GRAPHQL_PATH};
use crate::shell::pipeline;
use crate::shell::state::AppState;

pub fn router<E: Executor>(state: AppState, executor: E) -> Router {
    let mut api = post(graphql::handle::<E>);
    if state.settings.environment.is_development() {
        api = api.get(graphql::graphiql);
    }

    let endpoints = Router::new()
        .route(GRAPHQL_PATH, api)
        .fallback(fallback)
        .layer(Extension(executor))
        .with_state(state.clone());

    pipeline::compose(endpoints, &state).layer(TraceLayer::new_for_http())
}

/// Controller routes first; whatever no controller answers goes to the SPA host.
async fn fallback(State(state): State<AppState>, request: Request) -> Response {
    if let Some((controller, route)) = state.controllers.resolve(request.uri().path()) {
        let identity = request
            .extensions()
            .get::<Identity>()
            .cloned()
            .unwrap_or_default();
        let scope = state.services.begin_scope(identity);
        if let Some(response) = controller.invoke(request.method(), &route, &scope).await {
            return response;
        }
    }
    state.spa.serve(request).await
}
