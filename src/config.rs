use std::net::SocketAddr;

use anyhow::{Context, Result};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://todos.db";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreConfig,
    pub bind_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let store = if database_url.eq_ignore_ascii_case("memory") {
            StoreConfig::Memory
        } else {
            StoreConfig::Sqlite(database_url)
        };
        let raw_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr.parse().with_context(|| format!("invalid BIND_ADDR `{raw_addr}`"))?;
        Ok(Config { store, bind_addr })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_sqlite_file_on_localhost() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.store, StoreConfig::Sqlite(DEFAULT_DATABASE_URL.into()));
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
    }

    #[test]
    fn memory_selects_in_process_store() {
        let config = Config::from_lookup(lookup(&[("DATABASE_URL", "memory"), ("BIND_ADDR", "0.0.0.0:8080")])).unwrap();
        assert_eq!(config.store, StoreConfig::Memory);
        assert_eq!(config.bind_addr.port(), 8080);
    }

    #[test]
    fn bad_bind_addr_is_an_error() {
        assert!(Config::from_lookup(lookup(&[("BIND_ADDR", "nowhere")])).is_err());
    }
}
