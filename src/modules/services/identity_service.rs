use crate::modules::security::core::identity::{Identity, Principal};
use crate::modules::security::core::policy::{self, AuthorizationError, Policy};

/// Read access to the caller of the current request.
#[derive(Debug, Clone)]
pub struct IdentityService {
    identity: Identity,
}

impl IdentityService {
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }

    pub fn current(&self) -> &Identity {
        &self.identity
    }

    pub fn subject(&self) -> Option<&str> {
        self.identity.claims()?.subject.as_deref()
    }

    pub fn require_authenticated(&self) -> Result<&Principal, AuthorizationError> {
        self.identity
            .principal()
            .ok_or(AuthorizationError::Unauthenticated {
                policy: Policy::Authenticated,
            })
    }

    pub fn satisfies(&self, policy: Policy) -> bool {
        policy::evaluate(policy, &self.identity)
    }
}
