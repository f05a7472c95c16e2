use anyhow::Context;

use scheduling::shell::{self, config::Settings, graphql::GRAPHQL_PATH, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init();

    let settings = Settings::from_env().context("reading settings")?;
    tracing::info!(?settings, "starting");
    let addr = settings.bind_addr;

    let app = shell::compose(settings).context("composing the application")?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!("GraphQL endpoint: http://{}{}", addr, GRAPHQL_PATH);
    axum::serve(listener, app).await?;
    Ok(())
}
