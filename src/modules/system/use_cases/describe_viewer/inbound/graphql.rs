use async_graphql::{Context, ErrorExtensions, Object, Result as GqlResult};
use std::sync::Arc;

use crate::modules::security::core::policy::{Policy, PolicyTable};
use crate::modules::security::use_cases::authorize_operation::guard::PolicyGuard;
use crate::modules::system::errors::ApiError;
use crate::shell::scope::RequestScope;

#[derive(async_graphql::SimpleObject, Clone)]
pub struct GqlViewer {
    pub subject: Option<String>,
    pub name: Option<String>,
    pub permissions: Vec<String>,
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn api_version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    async fn policies(&self) -> Vec<&'static str> {
        PolicyTable::standard().names()
    }

    #[graphql(guard = "PolicyGuard::new(Policy::Authenticated)")]
    async fn viewer(&self, context: &Context<'_>) -> GqlResult<GqlViewer> {
        let scope = context.data::<Arc<RequestScope>>()?;
        let principal = scope
            .identity
            .require_authenticated()
            .map_err(|e| ApiError::from(e).extend())?;
        Ok(GqlViewer {
            subject: principal.claims.subject.clone(),
            name: principal.claims.name.clone(),
            permissions: principal.claims.permissions.clone(),
        })
    }
}
