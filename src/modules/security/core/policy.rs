use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::modules::security::core::claims::PERMISSION_CLAIM;
use crate::modules::security::core::identity::Identity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Policy {
    Authenticated,
    Manager,
    PartTime,
    FullTime,
    Accounter,
    AccessToReports,
    AccessToCalendar,
    CanResetPassword,
}

impl Policy {
    pub const ALL: [Policy; 8] = [
        Policy::Authenticated,
        Policy::Manager,
        Policy::PartTime,
        Policy::FullTime,
        Policy::Accounter,
        Policy::AccessToReports,
        Policy::AccessToCalendar,
        Policy::CanResetPassword,
    ];

    /// Name used by operations and tokens to refer to this policy.
    pub fn name(self) -> &'static str {
        match self {
            Policy::Authenticated => "Authenticated",
            Policy::Manager => "Manager",
            Policy::PartTime => "Part-time",
            Policy::FullTime => "Full-time",
            Policy::Accounter => "Accounter",
            Policy::AccessToReports => "Access to reports",
            Policy::AccessToCalendar => "Access to calendar",
            Policy::CanResetPassword => "canResetPassword",
        }
    }

    /// The `permission` claim value this policy requires, if any.
    pub fn required_permission(self) -> Option<&'static str> {
        match self {
            Policy::Authenticated => None,
            other => Some(other.name()),
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Policy {
    type Err = AuthorizationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Policy::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| AuthorizationError::UnknownPolicy(s.to_string()))
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthorizationError {
    #[error("You are not authorized to run this operation: policy '{policy}' requires an authenticated user.")]
    Unauthenticated { policy: Policy },

    #[error(
        "You are not authorized to run this operation: policy '{policy}' requires claim '{claim}' with value '{value}'."
    )]
    MissingClaim {
        policy: Policy,
        claim: &'static str,
        value: &'static str,
    },

    #[error("authorization policy '{0}' is not defined")]
    UnknownPolicy(String),
}

pub fn evaluate(policy: Policy, identity: &Identity) -> bool {
    check(policy, identity).is_ok()
}

pub fn check(policy: Policy, identity: &Identity) -> Result<(), AuthorizationError> {
    let Some(claims) = identity.claims() else {
        return Err(AuthorizationError::Unauthenticated { policy });
    };
    match policy.required_permission() {
        None => Ok(()),
        Some(value) if claims.has_permission(value) => Ok(()),
        Some(value) => Err(AuthorizationError::MissingClaim {
            policy,
            claim: PERMISSION_CLAIM,
            value,
        }),
    }
}

/// Named policies, fixed at startup.
#[derive(Debug, Clone)]
pub struct PolicyTable {
    by_name: HashMap<&'static str, Policy>,
}

impl PolicyTable {
    pub fn standard() -> Self {
        Self {
            by_name: Policy::ALL.into_iter().map(|p| (p.name(), p)).collect(),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<Policy> {
        self.by_name.get(name).copied()
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.by_name.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn authorize(&self, name: &str, identity: &Identity) -> Result<(), AuthorizationError> {
        let policy = self
            .lookup(name)
            .ok_or_else(|| AuthorizationError::UnknownPolicy(name.to_string()))?;
        check(policy, identity)
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::standard()
    }
}
