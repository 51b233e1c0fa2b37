use crate::error::{Error, Result};
use dotenvy::dotenv;
use rand::Rng;
use std::env;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub fault_rate: f64,
    pub latency: Option<LatencyRange>,
    pub seed_data: bool,
    pub seed_candidates: usize,
    pub log_json: bool,
}

/// Artificial latency applied to every request, drawn uniformly from the range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencyRange {
    pub min: Duration,
    pub max: Duration,
}

impl LatencyRange {
    /// Parses `"200-1200"` (milliseconds) or a single fixed value like `"300"`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let (min, max) = match raw.split_once('-') {
            Some((lo, hi)) => (lo.trim().parse::<u64>().ok()?, hi.trim().parse::<u64>().ok()?),
            None => {
                let fixed = raw.parse::<u64>().ok()?;
                (fixed, fixed)
            }
        };
        if min > max {
            return None;
        }
        Some(Self {
            min: Duration::from_millis(min),
            max: Duration::from_millis(max),
        })
    }

    pub fn sample(&self) -> Duration {
        let (min, max) = (self.min.as_millis() as u64, self.max.as_millis() as u64);
        if min >= max {
            return self.min;
        }
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let fault_rate: f64 = get_env_parse_or("FAULT_RATE", 0.0)?;
        if !(0.0..=1.0).contains(&fault_rate) {
            return Err(Error::Config(format!(
                "FAULT_RATE must be between 0 and 1, got {}",
                fault_rate
            )));
        }

        let latency = match env::var("MOCK_LATENCY_MS") {
            Ok(raw) if !raw.trim().is_empty() => Some(LatencyRange::parse(&raw).ok_or_else(|| {
                Error::Config(format!("Invalid value for MOCK_LATENCY_MS: {}", raw))
            })?),
            _ => None,
        };

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", "0.0.0.0:8080"),
            database_url: get_env_or("DATABASE_URL", "sqlite://talentflow.db"),
            fault_rate,
            latency,
            seed_data: get_env_parse_or("SEED_DATA", true)?,
            seed_candidates: get_env_parse_or("SEED_CANDIDATES", 1000)?,
            log_json: get_env_or("LOG_FORMAT", "text").eq_ignore_ascii_case("json"),
        })
    }
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
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
