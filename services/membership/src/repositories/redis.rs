//! Redis-backed session token store
//!
//! Layout:
//! - `token:{token}` holds the JSON token document
//! - `token_owner:{username}` holds the owner's current token string

use async_trait::async_trait;
use common::cache::RedisPool;
use tracing::info;

use super::{StoreResult, TokenStore};
use crate::models::Token;

fn token_key(token: &str) -> String {
    format!("token:{}", token)
}

fn owner_key(username: &str) -> String {
    format!("token_owner:{}", username)
}

/// Token store on top of the shared Redis pool
#[derive(Clone)]
pub struct RedisTokenStore {
    redis_pool: RedisPool,
}

impl RedisTokenStore {
    pub fn new(redis_pool: RedisPool) -> Self {
        Self { redis_pool }
    }
}

#[async_trait]
impl TokenStore for RedisTokenStore {
    async fn find_by_token(&self, token: &str) -> StoreResult<Option<Token>> {
        match self.redis_pool.get(&token_key(token)).await? {
            Some(document) => Ok(Some(serde_json::from_str(&document)?)),
            None => Ok(None),
        }
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<Token>> {
        match self.redis_pool.get(&owner_key(username)).await? {
            Some(token) => self.find_by_token(&token).await,
            None => Ok(None),
        }
    }

    async fn replace_for_user(&self, token: &Token) -> StoreResult<()> {
        info!("Storing session token for user: {}", token.username);

        let owner = owner_key(&token.username);
        let removals: Vec<String> = self
            .redis_pool
            .get(&owner)
            .await?
            .filter(|previous| previous != &token.token)
            .map(|previous| token_key(&previous))
            .into_iter()
            .collect();

        let writes = [
            (token_key(&token.token), serde_json::to_string(token)?),
            (owner, token.token.clone()),
        ];

        self.redis_pool
            .replace_atomically(&removals, &writes)
            .await?;
        Ok(())
    }

    async fn delete(&self, token: &str) -> StoreResult<()> {
        let Some(stored) = self.find_by_token(token).await? else {
            return Ok(());
        };

        let owner = owner_key(&stored.username);
        let mut removals = vec![token_key(token)];
        if self.redis_pool.get(&owner).await?.as_deref() == Some(token) {
            removals.push(owner);
        }

        self.redis_pool.replace_atomically(&removals, &[]).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::cache::RedisConfig;

    async fn store() -> RedisTokenStore {
        let config = RedisConfig::from_env().expect("redis config");
        RedisTokenStore::new(RedisPool::new(&config).await.expect("redis pool"))
    }

    fn token(token: &str) -> Token {
        Token {
            token: token.to_string(),
            timestamp: 1_700_000_000,
            username: "redistest_alice".to_string(),
        }
    }

    #[test]
    fn test_key_layout() {
        assert_eq!(token_key("abc"), "token:abc");
        assert_eq!(owner_key("alice"), "token_owner:alice");
    }

    // Needs Redis at REDIS_URL.
    #[tokio::test]
    #[ignore]
    async fn test_replace_and_delete() {
        let store = store().await;

        store.replace_for_user(&token("redistest_1")).await.unwrap();
        store.replace_for_user(&token("redistest_2")).await.unwrap();

        assert!(store.find_by_token("redistest_1").await.unwrap().is_none());
        assert_eq!(
            store.find_by_username("redistest_alice").await.unwrap(),
            Some(token("redistest_2"))
        );

        store.delete("redistest_2").await.unwrap();
        assert!(store.find_by_username("redistest_alice").await.unwrap().is_none());
    }
}
