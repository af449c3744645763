use std::env;
use std::net::SocketAddr;

use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_DATABASE_URL: &str = "mysql://root@localhost:3306/robo_city";
const DEFAULT_IMAGE_API_URL: &str = "https://api.openai.com/v1/images/generations";
const DEFAULT_FALLBACK_IMAGE_URL: &str = "https://image.pollinations.ai/prompt/";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    MySql,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub db_max_connections: u32,
    pub store: StoreBackend,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub image_api_url: String,
    pub image_api_key: Option<String>,
    pub fallback_image_url: String,
    pub assets_dir: String,
    pub log_json: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = parse_var("BIND_ADDR", DEFAULT_BIND_ADDR)?;
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let db_max_connections = parse_var("DB_MAX_CONNECTIONS", "10")?;
        let store = match env::var("STORE").as_deref() {
            Ok("memory") => StoreBackend::Memory,
            Ok("mysql") | Err(_) => StoreBackend::MySql,
            Ok(other) => {
                return Err(ConfigError::Invalid {
                    name: "STORE",
                    value: other.to_string(),
                })
            }
        };
        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;
        let token_ttl_hours = parse_var("TOKEN_TTL_HOURS", "24")?;
        let image_api_url =
            env::var("IMAGE_API_URL").unwrap_or_else(|_| DEFAULT_IMAGE_API_URL.to_string());
        let image_api_key = env::var("IMAGE_API_KEY").ok().filter(|k| !k.is_empty());
        let fallback_image_url = env::var("FALLBACK_IMAGE_URL")
            .unwrap_or_else(|_| DEFAULT_FALLBACK_IMAGE_URL.to_string());
        let assets_dir = env::var("ASSETS_DIR").unwrap_or_else(|_| "assets".to_string());
        let log_json = parse_var("LOG_JSON", "false")?;

        Ok(Self {
            bind_addr,
            database_url,
            db_max_connections,
            store,
            jwt_secret,
            token_ttl_hours,
            image_api_url,
            image_api_key,
            fallback_image_url,
            assets_dir,
            log_json,
        })
    }

    /// Settings for tests and local runs that never touch the network or a database.
    pub fn for_tests() -> Self {
        Self {
            bind_addr: ([127, 0, 0, 1], 0).into(),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            db_max_connections: 1,
            store: StoreBackend::Memory,
            jwt_secret: "test-secret".to_string(),
            token_ttl_hours: 1,
            image_api_url: DEFAULT_IMAGE_API_URL.to_string(),
            image_api_key: None,
            fallback_image_url: DEFAULT_FALLBACK_IMAGE_URL.to_string(),
            assets_dir: "assets".to_string(),
            log_json: false,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: &str) -> Result<T, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.parse()
        .map_err(|_| ConfigError::Invalid { name, value: raw })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_var_falls_back_to_default() {
        let port: u32 = parse_var("ROBO_CITY_UNSET_VARIABLE", "42").unwrap();
        assert_eq!(port, 42);
    }

    #[test]
    fn parse_var_reports_bad_default() {
        let err = parse_var::<u32>("ROBO_CITY_UNSET_VARIABLE", "nope").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                name: "ROBO_CITY_UNSET_VARIABLE",
                ..
            }
        ));
    }
}
