use dotenvy::dotenv;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_DATABASE_URL: &str = "sqlite://duty_roster.db";
const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_LOG_DIR: &str = "logs";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("SERVER_ADDR `{value}` is not a socket address: {source}")]
    ServerAddr {
        value: String,
        source: std::net::AddrParseError,
    },

    #[error("SEED_SAMPLE_DATA must be true or false, got `{0}`")]
    SeedFlag(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub server_addr: SocketAddr,
    pub log_dir: PathBuf,
    /// Load the sample roster into an empty store at startup.
    pub seed_sample_data: bool,
}

impl Config {
    /// ✅ Load `.env`, then read the environment with defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let addr = value("SERVER_ADDR", DEFAULT_SERVER_ADDR);
        let server_addr: SocketAddr = addr
            .parse()
            .map_err(|source| ConfigError::ServerAddr { value: addr, source })?;

        let seed_sample_data = match value("SEED_SAMPLE_DATA", "true").trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => true,
            "false" | "0" | "no" => false,
            other => return Err(ConfigError::SeedFlag(other.to_string())),
        };

        Ok(Self {
            database_url: value("DATABASE_URL", DEFAULT_DATABASE_URL),
            server_addr,
            log_dir: PathBuf::from(value("LOG_DIR", DEFAULT_LOG_DIR)),
            seed_sample_data,
        })
    }
}
