use crate::error::{Error, Result};
use chrono::NaiveTime;
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    /// Start of the working-hours window suggestion slots are carved from.
    pub work_day_start: NaiveTime,
    /// End of the working-hours window (exclusive).
    pub work_day_end: NaiveTime,
    pub notify_webhook_url: Option<String>,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let work_day_start = get_env_time("WORK_DAY_START", "08:00")?;
        let work_day_end = get_env_time("WORK_DAY_END", "18:00")?;
        if work_day_end <= work_day_start {
            return Err(Error::Config(
                "WORK_DAY_END must be later than WORK_DAY_START".to_string(),
            ));
        }

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            database_url: get_env("DATABASE_URL")?,
            work_day_start,
            work_day_end,
            notify_webhook_url: env::var("NOTIFY_WEBHOOK_URL").ok(),
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_time(name: &str, default: &str) -> Result<NaiveTime> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    NaiveTime::parse_from_str(&raw, "%H:%M")
        .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e)))
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
