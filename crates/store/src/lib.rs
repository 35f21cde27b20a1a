//! Persistence backends for campaign lists.
//! One serialized JSON array per owner, in memory (L1/dev) or in Redis.

pub mod codec;
pub mod memory;
pub mod redis_store;

use std::sync::Arc;

use campaign_core::config::{StoreBackend, StoreConfig};
use campaign_sequence::CampaignStore;
use tracing::info;

pub use memory::MemoryStore;
pub use redis_store::RedisStore;

/// Build the configured backend.
pub async fn build_store(config: &StoreConfig) -> anyhow::Result<Arc<dyn CampaignStore>> {
    match config.backend {
        StoreBackend::Memory => {
            info!("Using in-memory campaign store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Redis => Ok(Arc::new(RedisStore::new(&config.redis).await?)),
    }
}
