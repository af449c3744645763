//! Per-player game stats and inventory for the lifetime of the process.
//!
//! Nothing here is written to the database. A restart starts every player
//! with empty stats and an empty inventory.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::models::{GameStats, Inventory};

#[derive(Debug, Default, Clone)]
struct PlayerRecord {
    stats: GameStats,
    inventory: Inventory,
}

#[derive(Default)]
pub struct PlayerLedger {
    players: RwLock<HashMap<i64, PlayerRecord>>,
}

impl PlayerLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record_game(&self, user_id: i64, score: i64) -> GameStats {
        let mut players = self.players.write().await;
        let stats = &mut players.entry(user_id).or_default().stats;
        stats.games_played += 1;
        stats.last_score = score;
        stats.best_score = stats.best_score.max(score);
        stats.total_score = stats.total_score.saturating_add(score);
        stats.last_played = Some(Utc::now());
        stats.clone()
    }

    pub async fn stats(&self, user_id: i64) -> GameStats {
        self.players
            .read()
            .await
            .get(&user_id)
            .map(|p| p.stats.clone())
            .unwrap_or_default()
    }

    pub async fn grant_item(&self, user_id: i64, item_id: &str) -> Inventory {
        let mut players = self.players.write().await;
        let inventory = &mut players.entry(user_id).or_default().inventory;
        *inventory.entry(item_id.to_string()).or_insert(0) += 1;
        inventory.clone()
    }

    /// Claims a once-only item. Returns false when the player already holds
    /// it; check and insert happen under one write lock.
    pub async fn try_grant(&self, user_id: i64, item_id: &str) -> bool {
        let mut players = self.players.write().await;
        let inventory = &mut players.entry(user_id).or_default().inventory;
        if inventory.contains_key(item_id) {
            return false;
        }
        inventory.insert(item_id.to_string(), 1);
        true
    }

    /// Gives back a claim made by [`PlayerLedger::try_grant`] whose payment fell through.
    pub async fn release(&self, user_id: i64, item_id: &str) {
        if let Some(player) = self.players.write().await.get_mut(&user_id) {
            player.inventory.remove(item_id);
        }
    }

    pub async fn inventory(&self, user_id: i64) -> Inventory {
        self.players
            .read()
            .await
            .get(&user_id)
            .map(|p| p.inventory.clone())
            .unwrap_or_default()
    }

    pub async fn owns(&self, user_id: i64, item_id: &str) -> bool {
        self.players
            .read()
            .await
            .get(&user_id)
            .is_some_and(|p| p.inventory.contains_key(item_id))
    }

    /// Drops everything held for a player.
    pub async fn forget(&self, user_id: i64) {
        self.players.write().await.remove(&user_id);
    }
}
