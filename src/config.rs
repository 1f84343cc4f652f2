use crate::errors::ConfigError;
use crate::identity::Identity;
use std::{env, path::PathBuf, str::FromStr, time::Duration};
use tracing::info;

pub struct Config {
    pub port: u16,
    pub data_dir: PathBuf,
    pub debounce: Duration,
    pub account: Option<Identity>,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let account = var("APP_USER_ID").map(|id| Identity {
            display_name: var("APP_USER_NAME").unwrap_or_else(|| id.clone()),
            id,
        });
        if account.is_none() {
            info!("APP_USER_ID not set, sign-in will be rejected");
        }

        Ok(Self {
            port: parse_or("PORT", 8080)?,
            data_dir: PathBuf::from(var("APP_DATA_DIR").unwrap_or_else(|| "data".to_string())),
            debounce: Duration::from_millis(parse_or("APP_DEBOUNCE_MS", 1000)?),
            account,
        })
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_or<T: FromStr + std::fmt::Display>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match var(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
