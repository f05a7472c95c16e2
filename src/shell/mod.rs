// Composition root.
//
// - Read settings once at startup and pass them explicitly.
// - Instantiate concrete infrastructure (data store, mail outbox).
// - Register per-request services and build the request pipeline.

pub mod config;
pub mod graphql;
pub mod http;
pub mod pipeline;
pub mod scope;
pub mod state;
pub mod telemetry;

use axum::Router;
use std::sync::Arc;
use thiserror::Error;

use crate::modules::security::use_cases::verify_token::verifier::{
    TokenValidationParameters, TokenVerifier,
};
use crate::shared::infrastructure::data_access::in_memory::InMemoryDataStore;
use crate::shared::infrastructure::data_access::{ConnectionString, ConnectionStringError, DataStore};
use crate::shared::infrastructure::mail_outbox::MailOutbox;
use crate::shared::infrastructure::mail_outbox::in_memory::InMemoryMailOutbox;
use config::Settings;
use pipeline::controllers::ControllerRegistry;
use pipeline::spa::SpaHost;
use scope::ServiceProvider;
use state::AppState;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid DefaultConnection: {0}")]
    Connection(#[from] ConnectionStringError),

    #[error("cannot build the SPA dev server client: {0}")]
    SpaClient(#[from] reqwest::Error),
}

pub fn build_state(
    settings: Settings,
    store: Arc<dyn DataStore>,
    outbox: Arc<dyn MailOutbox>,
) -> Result<AppState, StartupError> {
    let connection = ConnectionString::parse(&settings.default_connection)?;
    tracing::info!(
        server = connection.server().unwrap_or("-"),
        database = connection.database().unwrap_or("-"),
        "data store configured"
    );

    let verifier = TokenVerifier::new(&TokenValidationParameters::new(
        &settings.secret_key,
        settings.jwt_issuer.clone(),
        settings.jwt_audience.clone(),
    ));
    let services = ServiceProvider::new(store, outbox, settings.mail_sender.clone());
    let spa = SpaHost::for_settings(&settings)?;

    Ok(AppState {
        settings: Arc::new(settings),
        verifier: Arc::new(verifier),
        services,
        controllers: Arc::new(ControllerRegistry::standard()),
        spa: Arc::new(spa),
    })
}

pub fn compose(settings: Settings) -> Result<Router, StartupError> {
    let state = build_state(
        settings,
        Arc::new(InMemoryDataStore::new()),
        Arc::new(InMemoryMailOutbox::new()),
    )?;
    let schema = graphql::build_schema(&state.settings);
    Ok(http::router(state, schema))
}
