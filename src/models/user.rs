use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const STARTING_ENERGY: i64 = 100;
pub const MAX_ENERGY: i64 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub coins: i64,
    pub score: i64,
    pub energy: i64,
    pub created_at: DateTime<Utc>,
}
