use async_graphql::ErrorExtensions;
use thiserror::Error;

use crate::modules::security::core::policy::AuthorizationError;
use crate::shared::infrastructure::mail_outbox::MailError;

pub const DETAIL_EXTENSION: &str = "detail";
pub const INTERNAL_CODE: &str = "INTERNAL";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Unauthorized(#[from] AuthorizationError),

    #[error("unexpected: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "BAD_USER_INPUT",
            ApiError::Unauthorized(AuthorizationError::Unauthenticated { .. }) => "UNAUTHENTICATED",
            ApiError::Unauthorized(_) => "FORBIDDEN",
            ApiError::Internal(_) => INTERNAL_CODE,
        }
    }
}

impl From<MailError> for ApiError {
    fn from(error: MailError) -> Self {
        match error {
            MailError::Validation(reason) => ApiError::Validation(reason),
            other => ApiError::Internal(anyhow::Error::new(other)),
        }
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> async_graphql::Error {
        if let ApiError::Unauthorized(inner) = self {
            return inner.extend();
        }
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| {
            e.set("code", self.code());
            if let ApiError::Internal(source) = self {
                e.set(DETAIL_EXTENSION, format!("{source:?}"));
            }
        })
    }
}
