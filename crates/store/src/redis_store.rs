//! Redis-backed campaign store. Each owner's list lives under
//! `{key_prefix}:{owner_id}` as one JSON array.

use async_trait::async_trait;
use campaign_core::config::RedisConfig;
use campaign_sequence::{CampaignStore, CampaignWorkflow};
use redis::AsyncCommands;
use tracing::{debug, info};

use crate::codec;

pub struct RedisStore {
    client: redis::Client,
    key_prefix: String,
}

impl RedisStore {
    /// Connect to Redis and verify the server answers.
    pub async fn new(config: &RedisConfig) -> anyhow::Result<Self> {
        info!(url = %config.url, "Connecting to Redis");

        let client = redis::Client::open(config.url.as_str())?;

        // Verify connectivity
        let mut conn = client.get_multiplexed_async_connection().await?;
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        info!(response = %pong, "Redis connection established");

        Ok(Self {
            client,
            key_prefix: config.key_prefix.clone(),
        })
    }

    fn key(&self, owner_id: &str) -> String {
        owner_key(&self.key_prefix, owner_id)
    }
}

fn owner_key(prefix: &str, owner_id: &str) -> String {
    format!("{prefix}:{owner_id}")
}

#[async_trait]
impl CampaignStore for RedisStore {
    async fn load(&self, owner_id: &str) -> anyhow::Result<Vec<CampaignWorkflow>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let data: Option<String> = conn.get(self.key(owner_id)).await?;

        match data {
            Some(json) => {
                metrics::counter!("store.redis.hit").increment(1);
                codec::decode(&json)
            }
            None => {
                metrics::counter!("store.redis.miss").increment(1);
                debug!(owner_id = owner_id, "No stored campaigns for owner");
                Ok(Vec::new())
            }
        }
    }

    async fn store(&self, owner_id: &str, campaigns: &[CampaignWorkflow]) -> anyhow::Result<()> {
        let key = self.key(owner_id);
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        if campaigns.is_empty() {
            conn.del::<_, ()>(&key).await?;
        } else {
            let json = codec::encode(campaigns)?;
            conn.set::<_, _, ()>(&key, json).await?;
        }
        metrics::counter!("store.redis.write").increment(1);
        debug!(owner_id = owner_id, count = campaigns.len(), "Stored campaigns in Redis");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_key() {
        assert_eq!(owner_key("campaigns", "user-7"), "campaigns:user-7");
    }

    /// Requires a local Redis.
    #[tokio::test]
    #[ignore]
    async fn test_redis_round_trip() {
        use campaign_sequence::CampaignSettings;

        let store = RedisStore::new(&RedisConfig::default()).await.unwrap();
        let owner = format!("test-{}", std::process::id());
        let wf = CampaignWorkflow::new(owner.as_str(), CampaignSettings::named("Redis"));

        store.store(&owner, &[wf.clone()]).await.unwrap();
        assert_eq!(store.load(&owner).await.unwrap(), vec![wf]);
        store.store(&owner, &[]).await.unwrap();
        assert!(store.load(&owner).await.unwrap().is_empty());
    }
}
