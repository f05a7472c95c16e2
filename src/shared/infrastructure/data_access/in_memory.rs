use crate::shared::infrastructure::data_access::DataStore;
use serde_json::Value as Json;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryDataStore {
    documents: RwLock<HashMap<(String, String), Json>>,
    is_offline: bool,
}

impl InMemoryDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    fn ensure_online(&self) -> anyhow::Result<()> {
        if self.is_offline {
            anyhow::bail!("Data store offline");
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl DataStore for InMemoryDataStore {
    async fn load(&self, collection: &str, key: &str) -> anyhow::Result<Option<Json>> {
        self.ensure_online()?;
        let guard = self.documents.read().await;
        Ok(guard
            .get(&(collection.to_string(), key.to_string()))
            .cloned())
    }

    async fn save(&self, collection: &str, key: &str, document: Json) -> anyhow::Result<()> {
        self.ensure_online()?;
        self.documents
            .write()
            .await
            .insert((collection.to_string(), key.to_string()), document);
        Ok(())
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.ensure_online()
    }
}
