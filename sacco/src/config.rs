use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

pub struct Config {
    /// Base URL the static JSON documents are served under.
    pub data_url: String,
    pub exchange_api_url: String,
    pub exchange_api_key: String,
    pub news_api_url: String,
    pub news_api_key: String,
}

impl Config {
    pub fn load() -> Self {
        Self {
            data_url: try_load("SACCO_DATA_URL", "http://localhost:5173/json"),
            exchange_api_url: try_load("EXCHANGE_API_URL", "https://v6.exchangerate-api.com/v6"),
            exchange_api_key: try_load("EXCHANGE_API_KEY", ""),
            news_api_url: try_load("NEWS_API_URL", "https://newsapi.org/v2"),
            news_api_key: try_load("NEWS_API_KEY", ""),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}
