//! Redis cache module for the studio membership services
//!
//! This module provides functionality for connecting to Redis and performing
//! the key operations the services need: single get/set/delete with optional
//! TTL, plus atomic multi-key writes for documents that keep a secondary index.

use crate::error::{CacheError, CacheResult};
use redis::{AsyncCommands, Client};
use tracing::info;

/// Configuration for Redis connection
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis connection URL (e.g., "redis://localhost:6379")
    pub url: String,
}

impl RedisConfig {
    /// Create a new RedisConfig from environment variables
    ///
    /// # Environment Variables
    /// - `REDIS_URL`: Redis connection URL (default: "redis://localhost:6379")
    pub fn from_env() -> CacheResult<Self> {
        let url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());

        Ok(RedisConfig { url })
    }
}

/// Redis connection pool
#[derive(Clone)]
pub struct RedisPool {
    client: Client,
}

impl RedisPool {
    /// Initialize a new Redis connection pool
    pub async fn new(config: &RedisConfig) -> CacheResult<Self> {
        let client = Client::open(config.url.clone()).map_err(CacheError::Connection)?;
        info!("Redis client initialized with URL: {}", config.url);
        Ok(RedisPool { client })
    }

    async fn get_connection(&self) -> CacheResult<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(CacheError::Connection)
    }

    /// Set a key-value pair in Redis with optional TTL
    pub async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> CacheResult<()> {
        let mut conn = self.get_connection().await?;

        if let Some(ttl) = ttl_seconds {
            let _: () = conn
                .set_ex(key, value, ttl)
                .await
                .map_err(CacheError::Command)?;
        } else {
            let _: () = conn.set(key, value).await.map_err(CacheError::Command)?;
        }

        Ok(())
    }

    /// Get a value from Redis by key
    pub async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.get_connection().await?;
        let value: Option<String> = conn.get(key).await.map_err(CacheError::Command)?;
        Ok(value)
    }

    /// Delete a key from Redis
    pub async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.get_connection().await?;
        let _: u64 = conn.del(key).await.map_err(CacheError::Command)?;
        Ok(())
    }

    /// Delete `removals` and write `writes` in one MULTI/EXEC transaction.
    ///
    /// Deletions are queued first, so a key present in both lists ends up
    /// holding its new value.
    pub async fn replace_atomically(
        &self,
        removals: &[String],
        writes: &[(String, String)],
    ) -> CacheResult<()> {
        let mut conn = self.get_connection().await?;

        let mut pipe = redis::pipe();
        pipe.atomic();
        for key in removals {
            pipe.del(key).ignore();
        }
        for (key, value) in writes {
            pipe.set(key, value).ignore();
        }

        let _: () = pipe
            .query_async(&mut conn)
            .await
            .map_err(CacheError::Command)?;
        Ok(())
    }

    /// Check if Redis is reachable
    pub async fn health_check(&self) -> CacheResult<bool> {
        let mut conn = self.get_connection().await?;
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(CacheError::Command)?;
        Ok(pong == "PONG")
    }
}
