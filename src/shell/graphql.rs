use async_graphql::extensions::{ApolloTracing, Tracing};
use async_graphql::http::GraphiQLSource;
use async_graphql::{EmptySubscription, Executor, Schema, ServerError, Value};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Extension,
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};

pub use crate::modules::system::use_cases::describe_viewer::inbound::graphql::QueryRoot;
pub use crate::modules::system::use_cases::request_password_reset::inbound::graphql::MutationRoot;

use crate::modules::security::core::identity::Identity;
use crate::modules::system::errors::{DETAIL_EXTENSION, INTERNAL_CODE};
use crate::shell::config::{DefaultAccess, Settings};
use crate::shell::scope::Scoped;
use crate::shell::state::AppState;

pub const GRAPHQL_PATH: &str = "/graphql";

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(settings: &Settings) -> AppSchema {
    let mut builder = Schema::build(QueryRoot, MutationRoot, EmptySubscription).extension(Tracing);
    if settings.graphql_metrics {
        builder = builder.extension(ApolloTracing);
    }
    builder.finish()
}

/// API endpoint. Policies are enforced per field by the schema's guards.
pub async fn handle<E: Executor>(
    State(state): State<AppState>,
    Extension(executor): Extension<E>,
    Scoped(scope): Scoped,
    request: GraphQLRequest,
) -> Response {
    let identity: Identity = scope.identity.current().clone();

    if state.settings.default_access == DefaultAccess::Authenticated && !identity.is_authenticated() {
        let mut error = ServerError::new("authentication is required for this endpoint", None);
        error
            .extensions
            .get_or_insert_with(Default::default)
            .set("code", "UNAUTHENTICATED");
        let response = async_graphql::Response::from_errors(vec![error]);
        return (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, "Bearer")],
            GraphQLResponse::from(response),
        )
            .into_response();
    }

    let request = request.into_inner().data(identity).data(scope);
    let mut response = executor.execute(request).await;
    present_errors(&mut response, state.settings.environment.is_development());
    GraphQLResponse::from(response).into_response()
}

pub async fn graphiql() -> Html<String> {
    Html(GraphiQLSource::build().endpoint(GRAPHQL_PATH).finish())
}

/// Outside Development, errors lose their `detail` extension and internal messages.
pub fn present_errors(response: &mut async_graphql::Response, expose_detail: bool) {
    if expose_detail {
        return;
    }
    for error in response.errors.iter_mut() {
        let Some(extensions) = error.extensions.as_mut() else {
            continue;
        };
        let internal = extensions.get("code") == Some(&Value::from(INTERNAL_CODE));
        extensions.unset(DETAIL_EXTENSION);
        if internal {
            error.message = "internal server error".to_string();
        }
    }
}
