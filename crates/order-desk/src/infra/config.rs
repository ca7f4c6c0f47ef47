use std::{collections::HashMap, str::FromStr, time::Duration};

use anyhow::Context;

const PREFIX: &str = "ORDERS_";

const DEFAULT_CONCURRENCY: usize = 30;
const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 10;

pub struct Config {
    kv: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        let kv = std::env::vars()
            .filter(|(k, _)| k.starts_with(PREFIX))
            .collect();

        Self { kv }
    }
}

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn from_map(kv: HashMap<String, String>) -> Self {
        Self { kv }
    }

    pub fn optional(&self, key: &str) -> Option<&str> {
        self.kv.get(key).map(|v| v.as_str())
    }

    /// Parses `key` if set, otherwise returns `default`.
    pub fn parse_or<T>(&self, key: &str, default: T) -> anyhow::Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        match self.optional(key) {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("invalid value '{raw}' for config key '{key}'")),
            None => Ok(default),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub concurrency: usize,
    pub shutdown_timeout: Duration,
    pub log_filter: Option<String>,
}

impl Settings {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let concurrency = config.parse_or("ORDERS_CONCURRENCY", DEFAULT_CONCURRENCY)?;
        anyhow::ensure!(concurrency > 0, "ORDERS_CONCURRENCY must be at least 1");

        let timeout_secs =
            config.parse_or("ORDERS_SHUTDOWN_TIMEOUT_SECS", DEFAULT_SHUTDOWN_TIMEOUT_SECS)?;

        Ok(Self {
            concurrency,
            shutdown_timeout: Duration::from_secs(timeout_secs),
            log_filter: config.optional("ORDERS_LOG").map(str::to_string),
        })
    }
}
