use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::modules::services::email_service::validate_address;
use crate::modules::system::errors::ApiError;
use crate::shell::scope::RequestScope;

pub const PASSWORD_RESETS: &str = "password_resets";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordResetRequest {
    pub reset_id: String,
    pub email: String,
    pub requested_by: Option<String>,
    pub requested_at: i64,
}

/// Records a reset request for `email` and mails the reset code to it.
pub async fn request_password_reset(scope: &RequestScope, email: &str) -> Result<Uuid, ApiError> {
    let email = email.trim().to_ascii_lowercase();
    if email.is_empty() {
        return Err(ApiError::Validation("email is required".into()));
    }
    validate_address(&email)?;

    let reset_id = Uuid::now_v7();
    let request = PasswordResetRequest {
        reset_id: reset_id.to_string(),
        email: email.clone(),
        requested_by: scope.identity.subject().map(str::to_string),
        requested_at: Utc::now().timestamp_millis(),
    };

    scope
        .repository
        .put(PASSWORD_RESETS, &email, &request)
        .await?;

    scope
        .email
        .send(
            &email,
            "Password reset",
            &format!("Use reset code {reset_id} to choose a new password."),
        )
        .await?;

    tracing::info!(%reset_id, requested_by = ?request.requested_by, "password reset requested");
    Ok(reset_id)
}
