use std::sync::Arc;

use crate::modules::security::use_cases::verify_token::verifier::TokenVerifier;
use crate::shell::config::Settings;
use crate::shell::pipeline::controllers::ControllerRegistry;
use crate::shell::pipeline::spa::SpaHost;
use crate::shell::scope::ServiceProvider;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub verifier: Arc<TokenVerifier>,
    pub services: ServiceProvider,
    pub controllers: Arc<ControllerRegistry>,
    pub spa: Arc<SpaHost>,
}
