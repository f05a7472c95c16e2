// Per-request service registrations.
//
// One `RequestScope` per request: db context and domain services are built for that request
// only and released when the scope is dropped, whichever way the request ends.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::convert::Infallible;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

use crate::modules::security::core::identity::Identity;
use crate::modules::services::email_service::EmailService;
use crate::modules::services::identity_service::IdentityService;
use crate::modules::services::repository::DataBaseRepository;
use crate::shared::infrastructure::data_access::{DataStore, DbContext};
use crate::shared::infrastructure::mail_outbox::MailOutbox;
use crate::shell::state::AppState;

#[derive(Clone)]
pub struct ServiceProvider {
    store: Arc<dyn DataStore>,
    outbox: Arc<dyn MailOutbox>,
    mail_sender: String,
    open_scopes: Arc<AtomicUsize>,
}

impl ServiceProvider {
    pub fn new(
        store: Arc<dyn DataStore>,
        outbox: Arc<dyn MailOutbox>,
        mail_sender: impl Into<String>,
    ) -> Self {
        Self {
            store,
            outbox,
            mail_sender: mail_sender.into(),
            open_scopes: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn begin_scope(&self, identity: Identity) -> RequestScope {
        let id = Uuid::now_v7();
        let db = DbContext::open(id, self.store.clone());
        self.open_scopes.fetch_add(1, Ordering::SeqCst);
        tracing::trace!(scope = %id, "scope opened");
        RequestScope {
            id,
            identity: IdentityService::new(identity),
            email: EmailService::new(self.mail_sender.clone(), self.outbox.clone()),
            repository: DataBaseRepository::new(db.clone()),
            db,
            open_scopes: self.open_scopes.clone(),
        }
    }

    /// Number of scopes not yet released.
    pub fn open_scopes(&self) -> usize {
        self.open_scopes.load(Ordering::SeqCst)
    }
}

pub struct RequestScope {
    pub id: Uuid,
    pub db: DbContext,
    pub identity: IdentityService,
    pub email: EmailService,
    pub repository: DataBaseRepository,
    open_scopes: Arc<AtomicUsize>,
}

impl Drop for RequestScope {
    fn drop(&mut self) {
        self.open_scopes.fetch_sub(1, Ordering::SeqCst);
        tracing::trace!(scope = %self.id, "scope released");
    }
}

/// Extractor that opens the request scope for the caller attached by the authentication stage.
pub struct Scoped(pub Arc<RequestScope>);

impl FromRequestParts<AppState> for Scoped {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let identity = parts.extensions.get::<Identity>().cloned().unwrap_or_default();
        Ok(Scoped(Arc::new(state.services.begin_scope(identity))))
    }
}
