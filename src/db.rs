use anyhow::Result;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};

use crate::config::Config;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
        username VARCHAR(64) NOT NULL UNIQUE,
        email VARCHAR(255) NULL,
        coins BIGINT NOT NULL DEFAULT 0,
        score BIGINT NOT NULL DEFAULT 0,
        energy BIGINT NOT NULL DEFAULT 100,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS dolls (
        id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
        user_id BIGINT NOT NULL,
        name VARCHAR(128) NOT NULL,
        description TEXT NOT NULL,
        image_url TEXT NOT NULL,
        is_good BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        INDEX idx_dolls_user (user_id)
    )",
];

pub async fn connect_to_mysql(cfg: &Config) -> Result<MySqlPool> {
    tracing::info!(
        max_connections = cfg.db_max_connections,
        "connecting to MySQL"
    );
    let pool = MySqlPoolOptions::new()
        .max_connections(cfg.db_max_connections)
        .connect(&cfg.database_url)
        .await?;

    // Test the connection
    sqlx::query("SELECT 1").execute(&pool).await?;

    for statement in SCHEMA {
        sqlx::query(statement).execute(&pool).await?;
    }

    Ok(pool)
}
