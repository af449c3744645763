use axum::async_trait;
use sqlx::MySqlPool;

use super::{Store, StoreError};
use crate::models::user::STARTING_ENERGY;
use crate::models::{Doll, NewDoll, User};

const USER_COLUMNS: &str = "id, username, email, coins, score, energy, created_at";
/// SQLSTATE for "numeric value out of range".
const OUT_OF_RANGE: &str = "22003";

const DOLL_COLUMNS: &str = "id, user_id, name, description, image_url, is_good, created_at";

pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn require_user(&self, id: i64) -> Result<User, StoreError> {
        self.find_user(id)
            .await?
            .ok_or_else(|| StoreError::Inconsistent(format!("user {id} vanished after write")))
    }
}

fn range_error(e: sqlx::Error, column: &str) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.code().as_deref() == Some(OUT_OF_RANGE) => {
            StoreError::OutOfRange(column.to_string())
        }
        _ => StoreError::Database(e),
    }
}

#[async_trait]
impl Store for MySqlStore {
    async fn find_or_create_user(
        &self,
        username: &str,
        email: Option<&str>,
    ) -> Result<User, StoreError> {
        // LAST_INSERT_ID(id) makes the existing row's id visible when the username is taken.
        let result = sqlx::query(
            "INSERT INTO users (username, email, coins, score, energy) VALUES (?, ?, 0, 0, ?) \
             ON DUPLICATE KEY UPDATE id = LAST_INSERT_ID(id)",
        )
        .bind(username)
        .bind(email)
        .bind(STARTING_ENERGY)
        .execute(&self.pool)
        .await?;

        self.require_user(result.last_insert_id() as i64).await
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn add_score(
        &self,
        id: i64,
        score: i64,
        coins: i64,
    ) -> Result<Option<User>, StoreError> {
        let result =
            sqlx::query("UPDATE users SET score = score + ?, coins = coins + ? WHERE id = ?")
                .bind(score)
                .bind(coins)
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(|e| range_error(e, "score"))?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_user(id).await
    }

    async fn spend_coins(&self, id: i64, amount: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE users SET coins = coins - ? WHERE id = ? AND coins >= ?")
            .bind(amount)
            .bind(id)
            .bind(amount)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn spend_energy(&self, id: i64, amount: i64) -> Result<bool, StoreError> {
        let result =
            sqlx::query("UPDATE users SET energy = energy - ? WHERE id = ? AND energy >= ?")
                .bind(amount)
                .bind(id)
                .bind(amount)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn restore_energy(
        &self,
        id: i64,
        amount: i64,
        cap: i64,
    ) -> Result<Option<User>, StoreError> {
        sqlx::query("UPDATE users SET energy = LEAST(energy + ?, ?) WHERE id = ?")
            .bind(amount)
            .bind(cap)
            .bind(id)
            .execute(&self.pool)
            .await?;
        // rows_affected is 0 when energy was already at the cap, so look the row up instead.
        self.find_user(id).await
    }

    async fn insert_doll(&self, doll: NewDoll) -> Result<Doll, StoreError> {
        let result = sqlx::query(
            "INSERT INTO dolls (user_id, name, description, image_url, is_good) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(doll.user_id)
        .bind(&doll.name)
        .bind(&doll.description)
        .bind(&doll.image_url)
        .bind(doll.is_good)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_id() as i64;
        sqlx::query_as::<_, Doll>(&format!("SELECT {DOLL_COLUMNS} FROM dolls WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::Inconsistent(format!("doll {id} vanished after insert")))
    }

    async fn dolls_for_user(&self, user_id: i64) -> Result<Vec<Doll>, StoreError> {
        let dolls = sqlx::query_as::<_, Doll>(&format!(
            "SELECT {DOLL_COLUMNS} FROM dolls WHERE user_id = ? ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(dolls)
    }
}
