use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

use crate::kernel::stream_hub::DEFAULT_CAPACITY;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Report store; `None` serves an unavailable feed.
    pub database_url: Option<String>,
    /// JSON district table replacing the built-in Lipa City table.
    pub district_table_path: Option<PathBuf>,
    /// CORS origins; empty means any origin.
    pub allowed_origins: Vec<String>,
    pub stream_capacity: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            database_url: non_empty_var("DATABASE_URL"),
            district_table_path: non_empty_var("DISTRICT_TABLE_PATH").map(PathBuf::from),
            allowed_origins: parse_origins(env::var("ALLOWED_ORIGINS").ok().as_deref()),
            stream_capacity: match non_empty_var("STREAM_CAPACITY") {
                Some(value) => value
                    .parse()
                    .context("STREAM_CAPACITY must be a positive number")?,
                None => DEFAULT_CAPACITY,
            },
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Comma-separated origins; `*` or nothing means any origin.
fn parse_origins(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty() && *origin != "*")
        .map(str::to_string)
        .collect()
}
