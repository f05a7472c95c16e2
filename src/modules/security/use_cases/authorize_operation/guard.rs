use async_graphql::{Context, ErrorExtensions, Guard, Result as GqlResult};

use crate::modules::security::core::identity::Identity;
use crate::modules::security::core::policy::{self, AuthorizationError, Policy, PolicyTable};

/// Field guard enforcing one named policy before the resolver runs.
pub struct PolicyGuard {
    policy: Policy,
}

impl PolicyGuard {
    pub fn new(policy: Policy) -> Self {
        Self { policy }
    }

    pub fn named(name: &str) -> Result<Self, AuthorizationError> {
        PolicyTable::standard()
            .lookup(name)
            .map(Self::new)
            .ok_or_else(|| AuthorizationError::UnknownPolicy(name.to_string()))
    }
}

impl Guard for PolicyGuard {
    async fn check(&self, ctx: &Context<'_>) -> GqlResult<()> {
        let anonymous = Identity::Anonymous;
        let identity = ctx.data_opt::<Identity>().unwrap_or(&anonymous);
        policy::check(self.policy, identity).map_err(|e| {
            tracing::debug!(policy = %self.policy, error = %e, "operation denied");
            e.extend()
        })
    }
}

impl ErrorExtensions for AuthorizationError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| {
            match self {
                AuthorizationError::Unauthenticated { policy } => {
                    e.set("code", "UNAUTHENTICATED");
                    e.set("policy", policy.name());
                }
                AuthorizationError::MissingClaim { policy, .. } => {
                    e.set("code", "FORBIDDEN");
                    e.set("policy", policy.name());
                }
                AuthorizationError::UnknownPolicy(name) => {
                    e.set("code", "FORBIDDEN");
                    e.set("policy", name.as_str());
                }
            }
        })
    }
}
