//! In-process stores for tests and single-node runs

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{StoreResult, TokenStore, UserStore};
use crate::dues;
use crate::models::{BillingMonth, Due, Token, User};

/// Members held in a map keyed by username
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn insert(&self, user: &User) -> StoreResult<bool> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.username) {
            return Ok(false);
        }
        users.insert(user.username.clone(), user.clone());
        Ok(true)
    }

    async fn append_dues(&self, username: &str, new_dues: &[Due]) -> StoreResult<()> {
        let mut users = self.users.write().await;
        if let Some(user) = users.get_mut(username) {
            for due in new_dues {
                if !user.dues_list.iter().any(|d| d.date == due.date) {
                    user.dues_list.push(due.clone());
                }
            }
        }
        Ok(())
    }

    async fn enroll(
        &self,
        username: &str,
        enrolled_date: &str,
        time_slot: &str,
    ) -> StoreResult<()> {
        if let Some(user) = self.users.write().await.get_mut(username) {
            user.enrolled = true;
            user.enrolled_date = enrolled_date.to_string();
            user.time_slot = time_slot.to_string();
        }
        Ok(())
    }

    async fn set_time_slot(&self, username: &str, time_slot: &str) -> StoreResult<()> {
        if let Some(user) = self.users.write().await.get_mut(username) {
            user.time_slot = time_slot.to_string();
        }
        Ok(())
    }

    async fn mark_due_paid(&self, username: &str, month: BillingMonth) -> StoreResult<bool> {
        Ok(self
            .users
            .write()
            .await
            .get_mut(username)
            .is_some_and(|user| dues::mark_paid(&mut user.dues_list, month)))
    }
}

#[derive(Debug, Default)]
struct TokenMaps {
    by_token: HashMap<String, Token>,
    by_owner: HashMap<String, String>,
}

/// Tokens indexed by token string and by owner
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    maps: RwLock<TokenMaps>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.maps.read().await.by_token.len()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn find_by_token(&self, token: &str) -> StoreResult<Option<Token>> {
        Ok(self.maps.read().await.by_token.get(token).cloned())
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<Token>> {
        let maps = self.maps.read().await;
        Ok(maps
            .by_owner
            .get(username)
            .and_then(|token| maps.by_token.get(token))
            .cloned())
    }

    async fn replace_for_user(&self, token: &Token) -> StoreResult<()> {
        let mut maps = self.maps.write().await;
        if let Some(previous) = maps
            .by_owner
            .insert(token.username.clone(), token.token.clone())
        {
            maps.by_token.remove(&previous);
        }
        maps.by_token.insert(token.token.clone(), token.clone());
        Ok(())
    }

    async fn delete(&self, token: &str) -> StoreResult<()> {
        let mut maps = self.maps.write().await;
        if let Some(removed) = maps.by_token.remove(token) {
            if maps.by_owner.get(&removed.username).map(String::as_str) == Some(token) {
                maps.by_owner.remove(&removed.username);
            }
        }
        Ok(())
    }
}
