use crate::error::ConfigError;
use std::net::SocketAddr;

const DEFAULT_DATABASE_URL: &str = "sqlite://poll_board.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub bind_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let db_max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(raw) => match raw.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "DB_MAX_CONNECTIONS",
                        reason: format!("expected a positive integer, got {raw:?}"),
                    });
                }
            },
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let raw_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue {
                field: "BIND_ADDR",
                reason: e.to_string(),
            })?;

        Ok(Config {
            database_url,
            db_max_connections,
            bind_addr,
        })
    }
}
