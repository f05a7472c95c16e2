// Data access port.
//
// Documents are JSON values addressed by collection and key. The store is shared by the
// whole process; a `DbContext` is opened per request scope on top of it.

use async_trait::async_trait;
use serde_json::Value as Json;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConnectionStringError {
    #[error("connection string is empty")]
    Empty,

    #[error("malformed connection string segment '{0}'")]
    Malformed(String),
}

/// ADO-style `Key=Value;Key=Value` connection string. Keys are case-insensitive.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionString {
    pairs: BTreeMap<String, String>,
}

impl ConnectionString {
    pub fn parse(raw: &str) -> Result<Self, ConnectionStringError> {
        let mut pairs = BTreeMap::new();
        for segment in raw.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            let (key, value) = segment
                .split_once('=')
                .ok_or_else(|| ConnectionStringError::Malformed(segment.to_string()))?;
            let key = key.trim();
            if key.is_empty() {
                return Err(ConnectionStringError::Malformed(segment.to_string()));
            }
            pairs.insert(key.to_ascii_lowercase(), value.trim().to_string());
        }
        if pairs.is_empty() {
            return Err(ConnectionStringError::Empty);
        }
        Ok(Self { pairs })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs.get(&key.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn database(&self) -> Option<&str> {
        self.get("database").or_else(|| self.get("initial catalog"))
    }

    pub fn server(&self) -> Option<&str> {
        self.get("server").or_else(|| self.get("data source"))
    }
}

impl std::fmt::Debug for ConnectionString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionString")
            .field("server", &self.server())
            .field("database", &self.database())
            .finish_non_exhaustive()
    }
}

#[async_trait]
pub trait DataStore: Send + Sync {
    async fn load(&self, collection: &str, key: &str) -> anyhow::Result<Option<Json>>;
    async fn save(&self, collection: &str, key: &str, document: Json) -> anyhow::Result<()>;
    async fn ping(&self) -> anyhow::Result<()>;
}

/// Data access context for one request scope.
#[derive(Clone)]
pub struct DbContext {
    scope_id: Uuid,
    store: Arc<dyn DataStore>,
}

impl DbContext {
    pub fn open(scope_id: Uuid, store: Arc<dyn DataStore>) -> Self {
        Self { scope_id, store }
    }

    pub fn scope_id(&self) -> Uuid {
        self.scope_id
    }

    pub async fn load(&self, collection: &str, key: &str) -> anyhow::Result<Option<Json>> {
        tracing::trace!(scope = %self.scope_id, collection, key, "load");
        self.store.load(collection, key).await
    }

    pub async fn save(&self, collection: &str, key: &str, document: Json) -> anyhow::Result<()> {
        tracing::trace!(scope = %self.scope_id, collection, key, "save");
        self.store.save(collection, key, document).await
    }

    pub async fn ping(&self) -> anyhow::Result<()> {
        self.store.ping().await
    }
}

pub mod in_memory;
