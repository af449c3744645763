use std::collections::BTreeMap;

use axum::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{Store, StoreError};
use crate::models::user::STARTING_ENERGY;
use crate::models::{Doll, NewDoll, User};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    dolls: Vec<Doll>,
    next_user_id: i64,
    next_doll_id: i64,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_or_create_user(
        &self,
        username: &str,
        email: Option<&str>,
    ) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(user) = tables.users.values().find(|u| u.username == username) {
            return Ok(user.clone());
        }
        tables.next_user_id += 1;
        let user = User {
            id: tables.next_user_id,
            username: username.to_string(),
            email: email.map(str::to_string),
            coins: 0,
            score: 0,
            energy: STARTING_ENERGY,
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn add_score(
        &self,
        id: i64,
        score: i64,
        coins: i64,
    ) -> Result<Option<User>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(None);
        };
        let new_score = user
            .score
            .checked_add(score)
            .ok_or_else(|| StoreError::OutOfRange("score".to_string()))?;
        let new_coins = user
            .coins
            .checked_add(coins)
            .ok_or_else(|| StoreError::OutOfRange("coins".to_string()))?;
        user.score = new_score;
        user.coins = new_coins;
        Ok(Some(user.clone()))
    }

    async fn spend_coins(&self, id: i64, amount: i64) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        match tables.users.get_mut(&id) {
            Some(user) if user.coins >= amount => {
                user.coins -= amount;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn spend_energy(&self, id: i64, amount: i64) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        match tables.users.get_mut(&id) {
            Some(user) if user.energy >= amount => {
                user.energy -= amount;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn restore_energy(
        &self,
        id: i64,
        amount: i64,
        cap: i64,
    ) -> Result<Option<User>, StoreError> {
        let mut tables = self.tables.write().await;
        Ok(tables.users.get_mut(&id).map(|user| {
            user.energy = (user.energy + amount).min(cap);
            user.clone()
        }))
    }

    async fn insert_doll(&self, doll: NewDoll) -> Result<Doll, StoreError> {
        let mut tables = self.tables.write().await;
        tables.next_doll_id += 1;
        let doll = Doll {
            id: tables.next_doll_id,
            user_id: doll.user_id,
            name: doll.name,
            description: doll.description,
            image_url: doll.image_url,
            is_good: doll.is_good,
            created_at: Utc::now(),
        };
        tables.dolls.push(doll.clone());
        Ok(doll)
    }

    async fn dolls_for_user(&self, user_id: i64) -> Result<Vec<Doll>, StoreError> {
        let tables = self.tables.read().await;
        // Insertion order is creation order, so reversing gives newest first.
        Ok(tables
            .dolls
            .iter()
            .rev()
            .filter(|d| d.user_id == user_id)
            .cloned()
            .collect())
    }
}
