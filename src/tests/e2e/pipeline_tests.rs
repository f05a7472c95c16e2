use async_graphql::{EmptyMutation, EmptySubscription, Object, Schema};
use axum::{
    Router,
    body::Body,
    extract::Request,
    http::{StatusCode, header},
};
use rstest::rstest;
use std::net::SocketAddr;

use crate::shell::pipeline::https_redirection::FORWARDED_PROTO;
use crate::tests::fixtures::host::{TestHostBuilder, text};

struct FaultyQuery;

#[Object]
impl FaultyQuery {
    async fn roster(&self) -> i32 {
        panic!("roster cache <shard-3> poisoned")
    }
}

fn faulty_schema() -> Schema<FaultyQuery, EmptyMutation, EmptySubscription> {
    Schema::new(FaultyQuery, EmptyMutation, EmptySubscription)
}

fn post_query(query: &str) -> axum::http::Request<Body> {
    axum::http::Request::post("/graphql")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::json!({ "query": query }).to_string()))
        .unwrap()
}

#[rstest]
#[case("/css/site.css", "https://scheduling.example.com/css/site.css")]
#[case("/calendar?week=3", "https://scheduling.example.com/calendar?week=3")]
#[case("/graphql", "https://scheduling.example.com/graphql")]
#[tokio::test]
async fn it_should_redirect_plain_http_before_anything_else(#[case] path: &str, #[case] location: &str) {
    let host = TestHostBuilder::new().var("ENFORCE_HTTPS", "true").build();
    let response = host
        .send(
            axum::http::Request::get(path)
                .header(header::HOST, "scheduling.example.com:80")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], location);
    assert_eq!(host.state.services.open_scopes(), 0);
}

#[rstest]
#[tokio::test]
async fn it_should_redirect_to_a_configured_https_port() {
    let host = TestHostBuilder::new()
        .var("ENFORCE_HTTPS", "true")
        .var("HTTPS_PORT", "5001")
        .build();
    let response = host
        .send(
            axum::http::Request::get("/health")
                .header(header::HOST, "localhost:5000")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.headers()[header::LOCATION], "https://localhost:5001/health");
}

#[rstest]
#[tokio::test]
async fn it_should_pass_requests_forwarded_over_https_by_a_trusted_proxy() {
    let host = TestHostBuilder::new()
        .var("ENFORCE_HTTPS", "true")
        .var("TRUST_FORWARDED_PROTO", "true")
        .build();
    let response = host
        .send(
            axum::http::Request::get("/css/site.css")
                .header(header::HOST, "scheduling.example.com")
                .header(FORWARDED_PROTO, "https")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[rstest]
#[tokio::test]
async fn it_should_redirect_a_forged_forwarded_proto_header() {
    let host = TestHostBuilder::new().var("ENFORCE_HTTPS", "true").build();
    let response = host
        .send(
            axum::http::Request::get("/Health")
                .header(header::HOST, "scheduling.example.com")
                .header(FORWARDED_PROTO, "https")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "https://scheduling.example.com/Health");
    assert_eq!(host.state.services.open_scopes(), 0);
}

#[rstest]
#[tokio::test]
async fn it_should_serve_an_existing_asset_instead_of_the_shell() {
    let host = TestHostBuilder::new().build();
    let response = host.get("/static/js/main.js").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = text(response).await;
    assert!(body.contains("bootstrap"));
    assert!(!body.contains("<div id=\"root\">"));
}

#[rstest]
#[case("/")]
#[case("/calendar/2026/10")]
#[case("/reports/unknown-action/7")]
#[tokio::test]
async fn it_should_answer_unmatched_paths_with_the_shell_in_production(#[case] path: &str) {
    let host = TestHostBuilder::new().build();
    let response = host.get(path).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache");
    assert!(text(response).await.contains("<div id=\"root\">"));
}

async fn spawn_dev_server() -> SocketAddr {
    let app = Router::new().fallback(|request: Request| async move {
        format!("live client: {}", request.uri())
    });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

#[rstest]
#[tokio::test]
async fn it_should_proxy_unmatched_paths_to_the_dev_server_in_development() {
    let addr = spawn_dev_server().await;
    let host = TestHostBuilder::new()
        .development()
        .var("SPA_DEV_SERVER", format!("http://{addr}/"))
        .build();
    let response = host.get("/calendar/2026/10").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(text(response).await, "live client: /calendar/2026/10");
}

#[rstest]
#[tokio::test]
async fn it_should_answer_bad_gateway_when_the_dev_server_is_down() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let host = TestHostBuilder::new()
        .development()
        .var("SPA_DEV_SERVER", format!("http://{addr}"))
        .build();
    assert_eq!(host.get("/calendar").await.status(), StatusCode::BAD_GATEWAY);
}

#[rstest]
#[tokio::test]
async fn it_should_show_fault_detail_in_development() {
    let host = TestHostBuilder::new().development().build_with(faulty_schema());
    let response = host.send(post_query("{ roster }")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().get(header::STRICT_TRANSPORT_SECURITY).is_none());
    assert!(text(response).await.contains("roster cache &lt;shard-3&gt; poisoned"));
    assert_eq!(host.state.services.open_scopes(), 0);
}

#[rstest]
#[tokio::test]
async fn it_should_show_the_generic_error_page_outside_development() {
    let host = TestHostBuilder::new().build_with(faulty_schema());
    let response = host.send(post_query("{ roster }")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().contains_key(header::STRICT_TRANSPORT_SECURITY));
    let body = text(response).await;
    assert!(body.contains("An error occurred while processing your request."));
    assert!(!body.contains("shard-3"));
    assert_eq!(host.state.services.open_scopes(), 0);
}

#[rstest]
#[tokio::test]
async fn it_should_send_hsts_outside_development() {
    let host = TestHostBuilder::new().var("HSTS_MAX_AGE_SECS", "600").build();
    let response = host.get("/css/site.css").await;
    assert_eq!(response.headers()[header::STRICT_TRANSPORT_SECURITY], "max-age=600");
}

#[rstest]
#[tokio::test]
async fn it_should_report_health_through_the_controller_route() {
    let host = TestHostBuilder::new().build();
    let response = host.get("/Health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&text(response).await).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(host.state.services.open_scopes(), 0);
}

#[rstest]
#[tokio::test]
async fn it_should_render_the_error_controller() {
    let host = TestHostBuilder::new().build();
    let response = host.get("/Error").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(text(response).await.contains("An error occurred"));
}

#[rstest]
#[tokio::test]
async fn it_should_offer_graphiql_only_in_development() {
    let dev = TestHostBuilder::new().development().build();
    let response = dev.get("/graphql").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(text(response).await.contains("graphiql"));

    let production = TestHostBuilder::new().build();
    assert_eq!(
        production.get("/graphql").await.status(),
        StatusCode::METHOD_NOT_ALLOWED
    );
}
