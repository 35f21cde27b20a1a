//! In-process campaign store backed by DashMap for lock-free concurrent access.
//! Holds the serialized form so reads never alias a caller's workflow.

use async_trait::async_trait;
use campaign_sequence::{CampaignStore, CampaignWorkflow};
use dashmap::DashMap;
use tracing::debug;

use crate::codec;

/// Development and test backend: owner id -> encoded campaign list.
#[derive(Debug, Default)]
pub struct MemoryStore {
    store: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            store: DashMap::new(),
        }
    }

    /// Number of owners with a stored list.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

#[async_trait]
impl CampaignStore for MemoryStore {
    async fn load(&self, owner_id: &str) -> anyhow::Result<Vec<CampaignWorkflow>> {
        match self.store.get(owner_id) {
            Some(entry) => codec::decode(entry.value()),
            None => Ok(Vec::new()),
        }
    }

    async fn store(&self, owner_id: &str, campaigns: &[CampaignWorkflow]) -> anyhow::Result<()> {
        let data = codec::encode(campaigns)?;
        debug!(owner_id = owner_id, count = campaigns.len(), "Storing campaigns in memory");
        self.store.insert(owner_id.to_string(), data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_sequence::CampaignSettings;

    #[tokio::test]
    async fn test_unknown_owner_is_empty() {
        let store = MemoryStore::new();
        assert!(store.load("nobody").await.unwrap().is_empty());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_store_replaces_list() {
        let store = MemoryStore::new();
        let a = CampaignWorkflow::new("owner-1", CampaignSettings::named("A"));
        let b = CampaignWorkflow::new("owner-1", CampaignSettings::named("B"));

        store.store("owner-1", &[a.clone(), b.clone()]).await.unwrap();
        assert_eq!(store.load("owner-1").await.unwrap(), vec![a.clone(), b]);

        store.store("owner-1", &[a.clone()]).await.unwrap();
        assert_eq!(store.load("owner-1").await.unwrap(), vec![a]);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_owners_are_isolated() {
        let store = MemoryStore::new();
        let a = CampaignWorkflow::new("owner-1", CampaignSettings::named("A"));
        store.store("owner-1", &[a]).await.unwrap();
        assert!(store.load("owner-2").await.unwrap().is_empty());
    }
}
