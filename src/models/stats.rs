use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    pub games_played: u64,
    pub best_score: i64,
    pub last_score: i64,
    pub total_score: i64,
    pub last_played: Option<DateTime<Utc>>,
}

/// Item id to owned quantity.
pub type Inventory = BTreeMap<String, u32>;
