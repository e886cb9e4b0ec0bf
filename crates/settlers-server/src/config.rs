//! Server configuration from the environment.

use anyhow::Context;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub log_filter: String,
    /// Directory for JSON game files; games stay in memory when unset
    pub store_dir: Option<PathBuf>,
}

impl ServerConfig {
    /// Read `SERVER_ADDR`, `RUST_LOG` and `GAME_STORE_DIR`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let raw_addr = lookup("SERVER_ADDR").unwrap_or_else(|| DEFAULT_ADDR.into());
        let addr = raw_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("invalid SERVER_ADDR {raw_addr:?}"))?;

        Ok(Self {
            addr,
            log_filter: lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.into()),
            store_dir: lookup("GAME_STORE_DIR")
                .filter(|dir| !dir.is_empty())
                .map(PathBuf::from),
        })
    }
}
