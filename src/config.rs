// src/config.rs

use std::env;
use std::net::SocketAddr;

use dotenvy::dotenv;

#[derive(Debug, Clone)]
pub struct Config {
    pub rust_log: String,
    pub bind_addr: SocketAddr,
    pub log_dir: String,
    /// Used for assessments created without explicit base points.
    pub default_base_points: i64,
    pub cors_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rust_log: "info".to_string(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            log_dir: "logs".to_string(),
            default_base_points: 0,
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

impl Config {
    /// Reads the configuration from the environment (and `.env`, if present).
    /// Unset or unparsable variables keep their defaults.
    pub fn from_env() -> Self {
        dotenv().ok();

        let defaults = Self::default();

        let rust_log = env::var("RUST_LOG").unwrap_or(defaults.rust_log);

        let bind_addr = env::var("BIND_ADDR")
            .ok()
            .and_then(|addr| addr.parse().ok())
            .unwrap_or(defaults.bind_addr);

        let log_dir = env::var("LOG_DIR").unwrap_or(defaults.log_dir);

        let default_base_points = env::var("DEFAULT_BASE_POINTS")
            .ok()
            .and_then(|points| points.parse::<i64>().ok())
            .filter(|points| *points >= 0)
            .unwrap_or(defaults.default_base_points);

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or(defaults.cors_origins);

        Self {
            rust_log,
            bind_addr,
            log_dir,
            default_base_points,
            cors_origins,
        }
    }
}
