use std::fmt;

use crate::modules::security::core::claims::Claims;

/// Identity attached to a request by the authentication stage.
#[derive(Debug, Clone, Default)]
pub enum Identity {
    #[default]
    Anonymous,
    Authenticated(Principal),
}

impl Identity {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::Authenticated(_))
    }

    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Identity::Anonymous => None,
            Identity::Authenticated(principal) => Some(principal),
        }
    }

    pub fn claims(&self) -> Option<&Claims> {
        self.principal().map(|p| &p.claims)
    }
}

/// A verified caller. The raw token is kept for the lifetime of the request.
#[derive(Clone)]
pub struct Principal {
    pub claims: Claims,
    pub token: String,
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Principal")
            .field("claims", &self.claims)
            .field("token", &"[REDACTED]")
            .finish()
    }
}
