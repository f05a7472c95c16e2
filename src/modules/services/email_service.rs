use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::shared::infrastructure::mail_outbox::{MailError, MailOutbox, OutgoingMail};

#[derive(Clone)]
pub struct EmailService {
    sender: String,
    outbox: Arc<dyn MailOutbox>,
}

impl EmailService {
    pub fn new(sender: impl Into<String>, outbox: Arc<dyn MailOutbox>) -> Self {
        Self {
            sender: sender.into(),
            outbox,
        }
    }

    /// Queues a message and returns its id.
    pub async fn send(&self, to: &str, subject: &str, body: &str) -> Result<Uuid, MailError> {
        let to = to.trim();
        validate_address(to)?;
        let mail = OutgoingMail {
            message_id: Uuid::now_v7(),
            from: self.sender.clone(),
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
            queued_at: Utc::now(),
        };
        let id = mail.message_id;
        self.outbox.enqueue(mail).await?;
        tracing::info!(message_id = %id, "mail queued");
        Ok(id)
    }
}

/// Checks that `value` is a deliverable address before anything depends on it.
pub fn validate_address(value: &str) -> Result<(), MailError> {
    if looks_like_address(value) {
        Ok(())
    } else {
        Err(MailError::Validation(format!("'{value}' is not an email address")))
    }
}

fn looks_like_address(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@') && !value.contains(' ')
        }
        None => false,
    }
}
