use async_graphql::{Context, ErrorExtensions, ID, Object, Result as GqlResult};
use std::sync::Arc;

use crate::modules::security::core::policy::Policy;
use crate::modules::security::use_cases::authorize_operation::guard::PolicyGuard;
use crate::modules::system::use_cases::request_password_reset::handler::request_password_reset;
use crate::shell::scope::RequestScope;

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    #[graphql(guard = "PolicyGuard::new(Policy::CanResetPassword)")]
    async fn request_password_reset(&self, context: &Context<'_>, email: String) -> GqlResult<ID> {
        let scope = context.data::<Arc<RequestScope>>()?;
        let reset_id = request_password_reset(scope, &email)
            .await
            .map_err(|e| e.extend())?;
        Ok(ID(reset_id.to_string()))
    }
}
