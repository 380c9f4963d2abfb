use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Postgres {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

#[derive(Debug, Deserialize)]
pub struct Http {
    #[serde(default = "default_listen")]
    pub listen: String,
}

#[derive(Debug, Deserialize)]
pub struct Spin {
    #[serde(default = "default_event_key")]
    pub event_key: String,
}

#[derive(Debug, Deserialize)]
pub struct Partners {
    /// Fixed USD -> RUB rate used when crediting partner money balances.
    #[serde(default = "default_usd_to_rub_rate")]
    pub usd_to_rub_rate: f64,
}

#[derive(Debug, Deserialize)]
pub struct Services {
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub postgres: Postgres,
    #[serde(default)]
    pub http: Http,
    #[serde(default)]
    pub spin: Spin,
    #[serde(default)]
    pub partners: Partners,
    #[serde(default)]
    pub services: Services,
}

impl Settings {
    pub fn new(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

impl Default for Http {
    fn default() -> Self {
        Http {
            listen: default_listen(),
        }
    }
}

impl Default for Spin {
    fn default() -> Self {
        Spin {
            event_key: default_event_key(),
        }
    }
}

impl Default for Partners {
    fn default() -> Self {
        Partners {
            usd_to_rub_rate: default_usd_to_rub_rate(),
        }
    }
}

impl Default for Services {
    fn default() -> Self {
        Services {
            channel_capacity: default_channel_capacity(),
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_true() -> bool {
    true
}

fn default_listen() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_event_key() -> String {
    "spin".to_string()
}

fn default_usd_to_rub_rate() -> f64 {
    90.0
}

fn default_channel_capacity() -> usize {
    512
}
