use anyhow::Context as _;
use serde::{Serialize, de::DeserializeOwned};

use crate::shared::infrastructure::data_access::DbContext;

/// Typed documents over the request's [`DbContext`].
#[derive(Clone)]
pub struct DataBaseRepository {
    db: DbContext,
}

impl DataBaseRepository {
    pub fn new(db: DbContext) -> Self {
        Self { db }
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        collection: &str,
        key: &str,
    ) -> anyhow::Result<Option<T>> {
        match self.db.load(collection, key).await? {
            None => Ok(None),
            Some(document) => serde_json::from_value(document)
                .with_context(|| format!("document {collection}/{key} has an unexpected shape"))
                .map(Some),
        }
    }

    pub async fn put<T: Serialize>(
        &self,
        collection: &str,
        key: &str,
        value: &T,
    ) -> anyhow::Result<()> {
        let document = serde_json::to_value(value)
            .with_context(|| format!("cannot serialize document {collection}/{key}"))?;
        self.db.save(collection, key, document).await
    }
}
