use crate::shared::infrastructure::mail_outbox::{MailError, MailOutbox, OutgoingMail};
use std::collections::HashSet;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryMailOutbox {
    pub rows: Mutex<Vec<OutgoingMail>>,
    seen: Mutex<HashSet<Uuid>>,
    is_offline: bool,
}

impl InMemoryMailOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }
}

#[async_trait::async_trait]
impl MailOutbox for InMemoryMailOutbox {
    async fn enqueue(&self, mail: OutgoingMail) -> Result<(), MailError> {
        if self.is_offline {
            return Err(MailError::Backend("Mail outbox offline".into()));
        }
        {
            let mut seen = self.seen.lock().await;
            if !seen.insert(mail.message_id) {
                return Err(MailError::Duplicate(mail.message_id));
            }
        }
        self.rows.lock().await.push(mail);
        Ok(())
    }
}
