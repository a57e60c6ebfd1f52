use serde::Deserialize;
use std::env;
use std::time::Duration;

// Top-level configuration container for the whole service
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub holds: HoldConfig,
    pub sweep: SweepConfig,
    pub feed: FeedConfig,
}

// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
}

// Hold lifecycle policy
#[derive(Debug, Clone, Deserialize)]
pub struct HoldConfig {
    pub default_ttl_seconds: u64,
    pub max_holds_per_session: usize,
}

// Expiration sweeper settings
#[derive(Debug, Clone, Deserialize)]
pub struct SweepConfig {
    pub interval_ms: u64,
}

// Client sync feed settings
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    pub log_capacity: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            app: AppConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "8000".to_string())
                    .parse()
                    .expect("PORT must be a valid number"),
                environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
                rust_log: env::var("RUST_LOG")
                    .unwrap_or_else(|_| "seat_holds=debug,tower_http=debug".to_string()),
            },
            holds: HoldConfig {
                default_ttl_seconds: env::var("DEFAULT_HOLD_TTL_SECONDS")
                    .unwrap_or_else(|_| "300".to_string())
                    .parse()
                    .expect("DEFAULT_HOLD_TTL_SECONDS must be a valid number"),
                max_holds_per_session: env::var("MAX_HOLDS_PER_SESSION")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .expect("MAX_HOLDS_PER_SESSION must be a valid number"),
            },
            sweep: SweepConfig {
                interval_ms: env::var("SWEEP_INTERVAL_MS")
                    .unwrap_or_else(|_| "1000".to_string())
                    .parse()
                    .expect("SWEEP_INTERVAL_MS must be a valid number"),
            },
            feed: FeedConfig {
                log_capacity: env::var("FEED_LOG_CAPACITY")
                    .unwrap_or_else(|_| "1024".to_string())
                    .parse()
                    .expect("FEED_LOG_CAPACITY must be a valid number"),
            },
        }
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep.interval_ms)
    }
}
