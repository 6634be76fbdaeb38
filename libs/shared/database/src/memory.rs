use std::collections::HashMap;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::debug;

use crate::store::{compare_values, Collection, DocumentStore, Filter, FindOptions, SortOrder};

/// Process-local document store. Used when no PostgREST endpoint is configured and in tests.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self, collection: Collection) -> usize {
        let collections = self.collections.read().await;
        collections.get(&collection).map_or(0, Vec::len)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: Collection, document: Value) -> Result<()> {
        if !document.is_object() {
            return Err(anyhow!("Documents must be JSON objects"));
        }

        let mut collections = self.collections.write().await;
        collections.entry(collection).or_default().push(document);
        debug!("Inserted document into {}", collection);
        Ok(())
    }

    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        options: FindOptions,
    ) -> Result<Vec<Value>> {
        let collections = self.collections.read().await;

        let mut found: Vec<Value> = collections
            .get(&collection)
            .map(|docs| docs.iter().filter(|doc| filter.matches(doc)).cloned().collect())
            .unwrap_or_default();

        if let Some((field, order)) = &options.sort {
            // Vec::sort_by is stable, so equal keys keep insertion order.
            found.sort_by(|a, b| {
                let ordering = compare_values(a.get(field), b.get(field));
                match order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            });
        }

        if let Some(limit) = options.limit {
            found.truncate(limit);
        }

        Ok(found)
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        changes: Map<String, Value>,
    ) -> Result<u64> {
        let mut collections = self.collections.write().await;

        let Some(document) = collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|doc| filter.matches(doc)))
        else {
            return Ok(0);
        };

        let fields = document
            .as_object_mut()
            .ok_or_else(|| anyhow!("Stored document in {} is not an object", collection))?;
        for (key, value) in changes {
            fields.insert(key, value);
        }

        Ok(1)
    }
}
