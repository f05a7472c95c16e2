use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub message_id: Uuid,
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub queued_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("duplicate mail {0}")]
    Duplicate(Uuid),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait MailOutbox: Send + Sync {
    async fn enqueue(&self, mail: OutgoingMail) -> Result<(), MailError>;
}

pub mod in_memory;
