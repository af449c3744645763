use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Doll {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub is_good: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields of a doll before the store assigns an id and timestamp.
#[derive(Debug, Clone)]
pub struct NewDoll {
    pub user_id: i64,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub is_good: bool,
}
