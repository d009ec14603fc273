/// Server configuration from command-line flags and environment variables
use clap::{Parser, ValueHint};
use std::path::PathBuf;

/// Default location of the registration dataset.
pub const DEFAULT_DATA_PATH: &str = "public/Electric_Vehicle_Population_Data.csv";

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "evdash-server", version, about = "EV registration dashboard server", long_about = None)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// CSV file with one registration per row
    #[arg(long, env = "EVDASH_DATA", default_value = DEFAULT_DATA_PATH, value_hint = ValueHint::FilePath)]
    pub data: PathBuf,

    /// Seconds clients may cache `/api/data`
    #[arg(long, env = "EVDASH_CACHE_MAX_AGE", default_value_t = 3600)]
    pub cache_max_age: u32,

    /// Load the dataset at startup instead of on the first request
    #[arg(long, env = "EVDASH_PRELOAD")]
    pub preload: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            data: PathBuf::from(DEFAULT_DATA_PATH),
            cache_max_age: 3600,
            preload: false,
        }
    }
}

impl ServerConfig {
    pub fn cache_control(&self) -> String {
        cache_control(self.cache_max_age)
    }
}

/// `Cache-Control` value for the raw dataset endpoint.
pub fn cache_control(max_age: u32) -> String {
    format!("public, max-age={}", max_age)
}
